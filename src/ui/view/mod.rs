//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod admin;
pub mod components;
pub mod layouts;
pub mod pages;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};

use super::routes::Route;
use super::state::{App, AppMode, ConfirmAction};
use components::{render_dialog_framework, render_input_widget};
use layouts::centered_rect;

const NAV: [(&str, &str); 4] = [("1", "Home"), ("2", "About"), ("3", "Contact"), ("4", "Admin")];

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 导航
            Constraint::Min(10),   // 页面
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_nav(frame, app, chunks[0]);

    match &app.route {
        Route::Home => pages::render_home(frame, app, chunks[1]),
        Route::Post(_) => pages::render_post(frame, app, chunks[1]),
        Route::About => pages::render_about(frame, chunks[1]),
        Route::Contact => pages::render_contact(frame, app, chunks[1]),
        Route::Admin => admin::render_dashboard(frame, app, chunks[1]),
        Route::AdminCreate | Route::AdminEdit(_) => admin::render_editor(frame, app, chunks[1]),
    }

    render_help(frame, app, chunks[2]);

    // 渲染弹窗
    match &app.mode {
        AppMode::GoTo => render_goto_dialog(frame, app),
        AppMode::Confirm(action) => render_confirm_dialog(frame, action),
        AppMode::Normal => {}
    }
}

fn render_nav(frame: &mut Frame, app: &App, area: Rect) {
    let selected = match app.route {
        Route::Home | Route::Post(_) => 0,
        Route::About => 1,
        Route::Contact => 2,
        Route::Admin | Route::AdminCreate | Route::AdminEdit(_) => 3,
    };
    let titles: Vec<Line> = NAV
        .iter()
        .map(|(key, name)| Line::from(format!("[{key}] {name}")))
        .collect();

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    " ✦ Lumina ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .title_bottom(Line::from(format!(" {} ", app.route)).right_aligned()),
        );
    frame.render_widget(tabs, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.mode {
        AppMode::GoTo => "[Enter] go  [Esc] cancel",
        AppMode::Confirm(_) => "[y] confirm  [n] cancel",
        AppMode::Normal => match &app.route {
            Route::Home => "[j/k] move  [h/l] category  [Enter] read  [:] go to  [q] quit",
            Route::Post(_) => "[b] back  [1-4] pages  [:] go to  [q] quit",
            Route::About => "[1-4] pages  [:] go to  [q] quit",
            Route::Contact if app.contact.submitted => "[Enter] send another  [1-4] pages  [q] quit",
            Route::Contact => "[Tab] next field  [Enter] next/send  [Esc] leave",
            Route::Admin => "[n] new  [e] edit  [d] delete  [j/k] move  [q] quit",
            Route::AdminCreate | Route::AdminEdit(_) => {
                "[Tab] next field  [←/→] category  [Ctrl-g] generate  [Ctrl-s] save  [Esc] cancel"
            }
        },
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_goto_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 25, frame.area());
    let inner = render_dialog_framework(frame, area, "Go to");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    render_input_widget(frame, chunks[0], "Path", &app.input_buffer, true, Color::Yellow);

    let hint = Paragraph::new("/  /post/:id  /about  /contact  /admin  /admin/create  /admin/edit/:id")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[1]);
}

fn render_confirm_dialog(frame: &mut Frame, action: &ConfirmAction) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let message = match action {
        ConfirmAction::Delete(_) => "Are you sure you want to delete this post?",
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] confirm  [n] cancel", message))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("⚠️ Confirm").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}
