pub mod config;
pub mod csv;
pub mod deck;
pub mod error;
pub mod file_io;
pub mod gateway;
pub mod gateway_worker;
pub mod logger;
pub mod models;
pub mod notes;
pub mod quiz;
pub mod session;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use csv::{encode_deck, parse_deck, parse_tsv_line};
pub use deck::DeckNavigator;
pub use error::{Result, StudyError};
pub use file_io::{EXPORT_MIME, export_filename, save_export};
pub use gateway::{HttpGateway, LectureGateway};
pub use models::{
    AppState, Flashcard, Lecture, LectureFilter, LectureListing, LectureStatus, LectureSummary,
    NoteBlock, QuizOption, QuizQuestion, UploadReceipt, UploadRequest,
};
pub use notes::parse_notes;
pub use quiz::{GradeBand, QuizScore, QuizSession, QuizState, grade};
pub use session::App;
