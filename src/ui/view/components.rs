//! 通用 UI 组件
//!
//! 对话框、输入框等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::models::Post;

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 带有标题和样式的输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    active_color: Color,
) {
    let style = if is_focused {
        Style::default()
            .fg(active_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    // 聚焦时在末尾显示光标
    let text = if is_focused {
        format!("{value}▏")
    } else {
        value.to_string()
    };

    let input = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);
}

/// [组件] 文章元信息行：作者首字母、作者、日期
pub fn byline(post: &Post) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {} ", post.author_initial()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} · ", post.author)),
        Span::styled(post.date.to_string(), Style::default().fg(Color::Gray)),
    ])
}

/// [组件] 分类标签
pub fn category_span(post: &Post) -> Span<'static> {
    Span::styled(
        post.category.to_string(),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )
}
