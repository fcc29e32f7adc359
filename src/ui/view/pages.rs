//! 公开页面：首页、文章详情、关于、联系

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::components::{byline, category_span, render_input_widget};
use super::layouts::padded;
use crate::models::Category;
use crate::ui::state::{App, ContactField};

pub fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_filter_bar(frame, app.filter, chunks[0]);

    let posts = app.visible_posts();
    if posts.is_empty() {
        let empty = Paragraph::new("No posts found in this category.")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().title("Latest Articles").borders(Borders::ALL));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = posts
        .iter()
        .map(|post| {
            ListItem::new(vec![
                Line::from(category_span(post)),
                Line::from(Span::styled(
                    post.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    post.excerpt.clone(),
                    Style::default().fg(Color::Gray),
                )),
                byline(post),
                Line::default(),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Latest Articles").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("▌ ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_filter_bar(frame: &mut Frame, filter: Option<Category>, area: Rect) {
    let mut spans = Vec::new();
    let options = std::iter::once(None).chain(Category::ALL.map(Some));
    for option in options {
        let label = option.map_or("All", Category::as_str);
        let style = if option == filter {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().title("Filter by category").borders(Borders::ALL));
    frame.render_widget(bar, area);
}

pub fn render_post(frame: &mut Frame, app: &App, area: Rect) {
    let Some(post) = &app.current else {
        let missing = Paragraph::new(vec![
            Line::from(Span::styled(
                "Post not found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("The article you are looking for does not exist or has been removed."),
            Line::default(),
            Line::from(Span::styled("[b] Back to Home", Style::default().fg(Color::Cyan))),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(missing, area);
        return;
    };

    let mut lines = vec![
        Line::from(category_span(post)),
        Line::from(Span::styled(
            post.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        byline(post),
        Line::from(Span::styled(
            format!("🖼  {}", post.image_url),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];
    lines.extend(post.paragraphs().map(|p| Line::from(p.to_string())));

    let article = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(article, padded(area, 2));
}

pub fn render_about(frame: &mut Frame, area: Rect) {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("About Lumina", heading)),
        Line::from(
            "We are a collective of passionate writers, developers, and creators sharing insights on the things that matter most.",
        ),
        Line::default(),
        Line::from(Span::styled("Our Mission", heading)),
        Line::from(
            "To provide high-quality, actionable content that empowers our readers to learn, grow, and innovate in their personal and professional lives.",
        ),
        Line::default(),
        Line::from(Span::styled("Community Driven", heading)),
        Line::from(
            "We believe in the power of community. Our platform is a space for dialogue, where diverse perspectives come together to create understanding.",
        ),
        Line::default(),
        Line::from(Span::styled("Innovation", heading)),
        Line::from(
            "Leveraging cutting-edge technologies like Gemini AI to enhance content creation and deliver the best possible experience to our users.",
        ),
    ];

    let about = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Who we are").borders(Borders::ALL));
    frame.render_widget(about, padded(area, 2));
}

pub fn render_contact(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let info = Paragraph::new(vec![
        Line::from("Have questions or feedback? Reach out to us directly through any of these channels."),
        Line::default(),
        Line::from("✉  contact@luminablog.com"),
        Line::from("☎  +1 (555) 123-4567"),
        Line::from("⌂  123 Blog Street, Digital City, WEB 2.0"),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Contact Information").borders(Borders::ALL));
    frame.render_widget(info, columns[0]);

    let form = &app.contact;
    if form.submitted {
        let sent = Paragraph::new(vec![
            Line::from(Span::styled(
                "✓ Message Sent!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("Thank you for reaching out. We'll get back to you shortly."),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Contact Us").borders(Borders::ALL));
        frame.render_widget(sent, columns[1]);
        return;
    }

    let block = Block::default().title("Contact Us").borders(Borders::ALL);
    let inner = block.inner(columns[1]);
    frame.render_widget(block, columns[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    let fields = [
        (ContactField::Name, "Name", &form.name),
        (ContactField::Email, "Email", &form.email),
        (ContactField::Message, "Message", &form.message),
    ];
    for (row, (field, title, value)) in rows.iter().zip(fields) {
        render_input_widget(frame, *row, title, value, form.field == field, Color::Yellow);
    }

    if let Some(error) = &form.error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            rows[3],
        );
    }
}
