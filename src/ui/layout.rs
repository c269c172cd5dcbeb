use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct LibraryLayout {
    pub header_area: Rect,
    pub search_area: Rect,
    pub list_area: Rect,
    pub message_area: Rect,
    pub footer_area: Rect,
}

pub struct LectureLayout {
    pub header_area: Rect,
    pub tabs_area: Rect,
    pub body_area: Rect,
    pub message_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_library_chunks(area: Rect) -> LibraryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    LibraryLayout {
        header_area: chunks[0],
        search_area: chunks[1],
        list_area: chunks[2],
        message_area: chunks[3],
        footer_area: chunks[4],
    }
}

pub fn calculate_lecture_chunks(area: Rect) -> LectureLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    LectureLayout {
        header_area: chunks[0],
        tabs_area: chunks[1],
        body_area: chunks[2],
        message_area: chunks[3],
        help_area: chunks[4],
    }
}

/// A `percent_x` by `percent_y` rectangle in the middle of `area`, for popups.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_library_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.search_area.height, 3);
        assert_eq!(layout.message_area.height, 1);
        assert_eq!(layout.footer_area.height, 3);
        // 40 - 2 margin - 10 fixed
        assert_eq!(layout.list_area.height, 28);
    }

    #[test]
    fn test_lecture_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_lecture_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.tabs_area.height, 3);
        assert_eq!(layout.help_area.height, 3);
        assert_eq!(layout.body_area.height, 28);
        assert!(layout.body_area.y > layout.tabs_area.y);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(50, 20, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 20);
    }
}
