use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rectangle of the given percentage size centred inside `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup = Layout::default()
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
        .split(popup[1])[1]
}

/// Screen column for a text cursor inside a bordered input, clamped to the box.
pub fn cursor_column(area: Rect, cursor: usize) -> u16 {
    let offset = u16::try_from(cursor).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(offset)
        .min(area.right().saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_column_stays_inside_the_box() {
        let area = Rect::new(10, 0, 30, 3);
        assert_eq!(cursor_column(area, 0), 11);
        assert_eq!(cursor_column(area, 3), 14);
        assert_eq!(cursor_column(area, 100_000), 38);
        assert_eq!(cursor_column(area, usize::MAX), 38);
    }
}
