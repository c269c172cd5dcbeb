use super::help_line;
use crate::session::{UploadField, UploadForm};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn field_block(label: &'static str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(label)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
}

pub fn draw_upload(f: &mut Frame, form: &UploadForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(2),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Upload Lecture")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let fields = [
        (UploadField::Title, "Title", &form.title),
        (UploadField::Video, "Video file", &form.video),
        (UploadField::Slides, "Slides (optional)", &form.slides),
    ];
    for (i, (field, label, value)) in fields.into_iter().enumerate() {
        let focused = form.field == field;
        let text = if focused {
            format!("{}_", value)
        } else {
            value.clone()
        };
        f.render_widget(
            Paragraph::new(text).block(field_block(label, focused)),
            chunks[i + 1],
        );
    }

    let message = if form.is_submitting() {
        Line::from(Span::styled(
            "Uploading...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
    } else {
        Line::from(Span::styled(
            "Give a title and a path to the lecture video.",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(
        Paragraph::new(message).wrap(Wrap { trim: true }),
        chunks[4],
    );

    let help = Paragraph::new(help_line(&[
        ("Tab", "Next field"),
        ("Enter", "Upload"),
        ("Esc", "Back"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[5]);
}
