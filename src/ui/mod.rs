pub mod layout;
mod lecture;
mod library;
mod upload;

pub use layout::{calculate_lecture_chunks, calculate_library_chunks, centered_rect};
pub use lecture::draw_lecture;
pub use library::{draw_delete_confirmation, draw_library};
pub use upload::draw_upload;

use crate::models::AppState;
use crate::session::App;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// "key Label  key Label" footer line with highlighted keys.
pub fn help_line(entries: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let spans: Vec<Span<'static>> = entries
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(key.to_string(), key_style),
                Span::from(format!(" {}  ", label)),
            ]
        })
        .collect();
    Line::from(spans)
}

pub fn draw(f: &mut Frame, app: &App) {
    match app.state {
        AppState::Library => draw_library(f, &app.library),
        AppState::DeleteConfirm => {
            draw_library(f, &app.library);
            draw_delete_confirmation(f, &app.library);
        }
        AppState::Upload => draw_upload(f, &app.upload),
        AppState::Lecture => match &app.lecture {
            Some(view) => draw_lecture(f, view),
            None => draw_library(f, &app.library),
        },
    }
}
