//! 管理页面：文章列表与编辑器

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::components::render_input_widget;
use crate::ui::state::{App, EditorField};

pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Admin Dashboard · Manage your blog content")
        .borders(Borders::ALL);

    if app.posts.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "No posts",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Get started by creating a new blog post. Press [n]."),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let style = if i == app.selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<48}", post.title), style),
                Span::styled(
                    format!("  {:<11}", post.category),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(
                    format!("  Posted on {} by {}", post.date, post.author),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = &app.editor else {
        return;
    };

    let heading = if editor.draft.is_editing() {
        "Edit Post"
    } else {
        "Create New Post"
    };
    let block = Block::default().title(heading).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题 + 分类
            Constraint::Length(3), // 作者 + 图片
            Constraint::Min(6),    // 正文
            Constraint::Length(4), // 摘要
            Constraint::Length(1), // 状态
        ])
        .split(inner);

    let pair = |area: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area)
    };
    let top = pair(rows[0]);
    let second = pair(rows[1]);

    let slots = [
        (EditorField::Title, top[0]),
        (EditorField::Category, top[1]),
        (EditorField::Author, second[0]),
        (EditorField::ImageUrl, second[1]),
        (EditorField::Content, rows[2]),
        (EditorField::Excerpt, rows[3]),
    ];
    for (field, slot) in slots {
        let focused = editor.field == field;
        let title = match field {
            EditorField::Category if focused => "Category ←/→".to_string(),
            EditorField::Content if app.is_generating() => "Content · Generating...".to_string(),
            _ => field.label().to_string(),
        };
        render_input_widget(frame, slot, &title, editor.value(field), focused, Color::Yellow);
    }

    let status = match &editor.error {
        Some(error) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
        None if !app.generator.is_configured() => {
            Paragraph::new("AI generation unavailable: no API key configured")
                .style(Style::default().fg(Color::DarkGray))
        }
        None => Paragraph::new("Write your post content here or use the AI generator")
            .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(status, rows[4]);
}
