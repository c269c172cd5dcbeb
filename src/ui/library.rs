use super::help_line;
use super::layout::{calculate_library_chunks, centered_rect};
use crate::models::{LectureStatus, LectureSummary};
use crate::session::LibraryView;
use crate::utils::{format_date, truncate_string};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

pub fn status_style(status: LectureStatus) -> Style {
    match status {
        LectureStatus::Completed => Style::default().fg(Color::Green),
        LectureStatus::Processing => Style::default().fg(Color::Yellow),
        LectureStatus::Failed => Style::default().fg(Color::Red),
    }
}

fn lecture_item(lecture: &LectureSummary, selected: bool, width: usize) -> ListItem<'static> {
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let details = format!(
        "  {}  {} cards  {} questions",
        format_date(lecture.created_at),
        lecture.flashcards_count,
        lecture.quiz_count
    );
    let title_width = width.saturating_sub(details.chars().count() + 14).max(10);

    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<12}", lecture.status.label()),
            status_style(lecture.status),
        ),
        Span::styled(truncate_string(&lecture.title, title_width), title_style),
        Span::styled(details, Style::default().fg(Color::DarkGray)),
    ]))
}

pub fn draw_library(f: &mut Frame, library: &LibraryView) {
    let layout = calculate_library_chunks(f.area());

    let title = Paragraph::new("My Lectures")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let search_text = if library.searching {
        format!("{}_", library.query)
    } else if library.query.is_empty() {
        "Press / to search by title".to_string()
    } else {
        library.query.clone()
    };
    let search = Paragraph::new(search_text)
        .style(if library.searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .block(Block::default().borders(Borders::ALL).title("Search"));
    f.render_widget(search, layout.search_area);

    let visible = library.visible();
    let width = layout.list_area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = if library.is_loading() && visible.is_empty() {
        vec![ListItem::new("Loading lectures...").style(Style::default().fg(Color::DarkGray))]
    } else if visible.is_empty() {
        vec![ListItem::new(library.empty_message()).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        visible
            .iter()
            .enumerate()
            .map(|(i, lecture)| lecture_item(lecture, i == library.selected, width))
            .collect()
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    f.render_widget(list, layout.list_area);

    let message = match (&library.error, &library.status) {
        (Some(error), _) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        (None, Some(status)) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        )),
        (None, None) => {
            let (lectures, cards, questions) = library.totals();
            Line::from(Span::styled(
                format!(
                    "{} lectures · {} flashcards · {} questions",
                    lectures, cards, questions
                ),
                Style::default().fg(Color::DarkGray),
            ))
        }
    };
    f.render_widget(Paragraph::new(message), layout.message_area);

    let help = if library.searching {
        help_line(&[("Type", "Filter"), ("Enter", "Keep"), ("Esc", "Clear")])
    } else {
        help_line(&[
            ("↑/↓", "Navigate"),
            ("Enter", "Open"),
            ("/", "Search"),
            ("u", "Upload"),
            ("d", "Delete"),
            ("r", "Reload"),
            ("q", "Quit"),
        ])
    };
    let help = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}

pub fn draw_delete_confirmation(f: &mut Frame, library: &LibraryView) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let title = library
        .delete_target
        .as_ref()
        .map(|l| l.title.as_str())
        .unwrap_or("this lecture");

    let text = vec![
        Line::from(format!("Delete '{}'?", truncate_string(title, 40))),
        Line::from(""),
        Line::from("This cannot be undone."),
        Line::from(""),
        help_line(&[("y", "Delete"), ("n/Esc", "Cancel")]),
    ];

    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(popup, area);
}
