//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::routes::Route;
use super::state::{App, AppMode};
use crate::storage::StoreError;

/// 根据当前模式、路由和按键获取对应的 Action
pub fn get_action(app: &App, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::GoTo => text_action(key.code),
        AppMode::Confirm(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        AppMode::Normal if app.route.is_editor() => editor_action(key),
        AppMode::Normal if app.route == Route::Contact && !app.contact.submitted => {
            match key.code {
                KeyCode::Tab => Some(Action::NextField),
                KeyCode::BackTab => Some(Action::PrevField),
                code => text_action(code),
            }
        }
        AppMode::Normal => browse_action(&app.route, key.code),
    }
}

fn text_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Char(c) => Some(Action::Input(c)),
        _ => None,
    }
}

fn editor_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => Some(Action::Save),
            KeyCode::Char('g') => Some(Action::Generate),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
        KeyCode::Right => Some(Action::NextChoice),
        KeyCode::Left => Some(Action::PrevChoice),
        KeyCode::Enter => Some(Action::Newline),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Char(c) => Some(Action::Input(c)),
        _ => None,
    }
}

fn browse_action(route: &Route, code: KeyCode) -> Option<Action> {
    let global = match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('1') => Some(Action::Navigate(Route::Home)),
        KeyCode::Char('2') => Some(Action::Navigate(Route::About)),
        KeyCode::Char('3') => Some(Action::Navigate(Route::Contact)),
        KeyCode::Char('4') => Some(Action::Navigate(Route::Admin)),
        KeyCode::Char(':') => Some(Action::OpenGoTo),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
        KeyCode::Esc | KeyCode::Char('b') => Some(Action::Back),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    match route {
        Route::Home => match code {
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextFilter),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevFilter),
            KeyCode::Enter => Some(Action::Open),
            _ => None,
        },
        Route::Admin => match code {
            KeyCode::Char('n') => Some(Action::StartCreate),
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::StartEdit),
            KeyCode::Char('d') => Some(Action::StartDelete),
            _ => None,
        },
        // 已提交的联系表单：Enter 重新填写
        Route::Contact => match code {
            KeyCode::Enter => Some(Action::Submit),
            _ => None,
        },
        _ => None,
    }
}

/// 处理按键事件；返回 `true` 表示退出
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<bool, StoreError> {
    if let Some(action) = get_action(app, key) {
        app.dispatch(action)
    } else {
        Ok(false)
    }
}
