use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 居中的弹窗区域
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// 正文区域左右留白
pub fn padded(r: Rect, horizontal: u16) -> Rect {
    Rect {
        x: r.x + horizontal.min(r.width / 2),
        width: r.width.saturating_sub(horizontal * 2),
        ..r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 25);
        assert_eq!(inner.y, 10);
    }

    #[test]
    fn test_padded_never_overflows() {
        let r = padded(Rect::new(0, 0, 6, 3), 10);
        assert_eq!(r.width, 0);
        assert!(r.x <= 3);
    }
}
