use crate::error::{Result, StudyError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LectureStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl LectureStatus {
    /// Anything the backend reports besides `completed`/`failed` is still in flight.
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => LectureStatus::Completed,
            "failed" => LectureStatus::Failed,
            _ => LectureStatus::Processing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LectureStatus::Processing => "processing",
            LectureStatus::Completed => "completed",
            LectureStatus::Failed => "failed",
        }
    }
}

impl<'de> Deserialize<'de> for LectureStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(LectureStatus::from_wire)
            .unwrap_or(LectureStatus::Processing))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    options: Vec<QuizOption>,
    correct_answer: String,
}

impl QuizQuestion {
    pub fn new(
        question: impl Into<String>,
        options: Vec<QuizOption>,
        correct_answer: impl Into<String>,
    ) -> Result<Self> {
        let question = question.into();
        let correct_answer = correct_answer.into();

        if options.is_empty() {
            return Err(StudyError::InvalidRecord(format!(
                "question '{}' has no options",
                question
            )));
        }

        let mut seen = HashSet::new();
        for option in &options {
            if !seen.insert(option.key.as_str()) {
                return Err(StudyError::InvalidRecord(format!(
                    "question '{}' repeats option key '{}'",
                    question, option.key
                )));
            }
        }

        if !seen.contains(correct_answer.as_str()) {
            return Err(StudyError::InvalidRecord(format!(
                "question '{}' names correct answer '{}' which is not an option",
                question, correct_answer
            )));
        }

        Ok(Self {
            question,
            options,
            correct_answer,
        })
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn option(&self, key: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }

    pub fn is_correct(&self, key: &str) -> bool {
        self.correct_answer == key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBlock {
    Heading(String),
    Bullet(String),
    Paragraph(String),
}

#[derive(Debug, Clone)]
pub struct Lecture {
    pub id: String,
    pub title: String,
    pub status: LectureStatus,
    pub notes: Vec<NoteBlock>,
    pub raw_notes: String,
    pub transcript: String,
    pub flashcards: Vec<Flashcard>,
    pub quiz: Vec<QuizQuestion>,
    pub video_url: Option<String>,
    pub slides_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LectureSummary {
    pub id: String,
    pub title: String,
    pub status: LectureStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub flashcards_count: usize,
    pub quiz_count: usize,
}

impl LectureSummary {
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureFilter {
    pub query: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for LectureFilter {
    fn default() -> Self {
        Self {
            query: None,
            limit: 10,
            offset: 0,
        }
    }
}

impl LectureFilter {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// Result of listing lectures. Never an `Err`: failures arrive as an empty
/// list with `error` set so the library screen stays usable.
#[derive(Debug, Default)]
pub struct LectureListing {
    pub lectures: Vec<LectureSummary>,
    pub error: Option<StudyError>,
}

impl LectureListing {
    pub fn failed(error: StudyError) -> Self {
        Self {
            lectures: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadRequest {
    pub title: String,
    pub video: Option<PathBuf>,
    pub slides: Option<PathBuf>,
}

impl UploadRequest {
    /// Checks everything that can be checked locally, before any request goes out.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(StudyError::Validation("Lecture title is required".into()));
        }
        let video = self
            .video
            .as_ref()
            .ok_or_else(|| StudyError::Validation("Video file is required".into()))?;
        if !video.is_file() {
            return Err(StudyError::Validation(format!(
                "Video file not found: {}",
                video.display()
            )));
        }
        if let Some(slides) = &self.slides
            && !slides.is_file()
        {
            return Err(StudyError::Validation(format!(
                "Slides file not found: {}",
                slides.display()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub lecture_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug)]
pub enum GatewayCall {
    FetchLecture { id: String },
    DeleteLecture { id: String },
    ListLectures { filter: LectureFilter },
    Upload { request: UploadRequest },
    RegenerateFlashcards { id: String },
    RegenerateQuiz { id: String },
}

#[derive(Debug)]
pub struct GatewayRequest {
    pub ticket: u64,
    pub call: GatewayCall,
}

#[derive(Debug)]
pub enum GatewayResponse {
    Lecture {
        ticket: u64,
        result: Result<Lecture>,
    },
    Deleted {
        ticket: u64,
        id: String,
        result: Result<()>,
    },
    Listing {
        ticket: u64,
        listing: LectureListing,
    },
    Uploaded {
        ticket: u64,
        result: Result<UploadReceipt>,
    },
    Flashcards {
        ticket: u64,
        id: String,
        result: Result<Vec<Flashcard>>,
    },
    Quiz {
        ticket: u64,
        id: String,
        result: Result<Vec<QuizQuestion>>,
    },
}

impl GatewayResponse {
    pub fn ticket(&self) -> u64 {
        match self {
            GatewayResponse::Lecture { ticket, .. }
            | GatewayResponse::Deleted { ticket, .. }
            | GatewayResponse::Listing { ticket, .. }
            | GatewayResponse::Uploaded { ticket, .. }
            | GatewayResponse::Flashcards { ticket, .. }
            | GatewayResponse::Quiz { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Library,
    Upload,
    Lecture,
    DeleteConfirm,
}
