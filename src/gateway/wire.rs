//! JSON shapes of the lecture backend and their conversion into the core model.

use crate::error::{Result, StudyError};
use crate::models::{
    Flashcard, Lecture, LectureStatus, LectureSummary, QuizOption, QuizQuestion, UploadReceipt,
};
use crate::notes::parse_notes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Lecture ids are UUID strings on the reference backend, integers on older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Text(s) => write!(f, "{}", s),
            WireId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireAnswer {
    Key(String),
    Index(usize),
}

/// Quiz options in document order, from either an object or an array.
#[derive(Debug, Clone, Default)]
pub struct WireOptions(pub Vec<QuizOption>);

fn option_key(position: usize) -> String {
    if position < 26 {
        char::from(b'A' + position as u8).to_string()
    } else {
        (position + 1).to_string()
    }
}

impl<'de> Deserialize<'de> for WireOptions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = WireOptions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of option keys to text, or a list of option texts")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut options = Vec::new();
                while let Some((key, text)) = map.next_entry::<String, String>()? {
                    options.push(QuizOption { key, text });
                }
                Ok(WireOptions(options))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut options = Vec::new();
                while let Some(text) = seq.next_element::<String>()? {
                    options.push(QuizOption {
                        key: option_key(options.len()),
                        text,
                    });
                }
                Ok(WireOptions(options))
            }
        }

        deserializer.deserialize_any(OptionsVisitor)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizQuestionRecord {
    pub question: String,
    #[serde(default)]
    pub options: WireOptions,
    #[serde(alias = "answer")]
    pub correct_answer: WireAnswer,
}

impl TryFrom<QuizQuestionRecord> for QuizQuestion {
    type Error = StudyError;

    fn try_from(record: QuizQuestionRecord) -> Result<Self> {
        let options = record.options.0;
        let correct = match record.correct_answer {
            WireAnswer::Key(key) => key.trim().to_string(),
            WireAnswer::Index(i) => options
                .get(i)
                .map(|o| o.key.clone())
                .ok_or_else(|| {
                    StudyError::InvalidRecord(format!(
                        "question '{}' marks option #{} correct but has {} options",
                        record.question,
                        i,
                        options.len()
                    ))
                })?,
        };
        QuizQuestion::new(record.question, options, correct)
    }
}

pub fn convert_quiz(records: Vec<QuizQuestionRecord>) -> Result<Vec<QuizQuestion>> {
    records.into_iter().map(QuizQuestion::try_from).collect()
}

/// Accepts RFC 3339, naive ISO-8601 (taken as UTC) or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Deserialize)]
pub struct LectureRecord {
    pub id: WireId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: LectureStatus,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub flashcards: Option<Vec<Flashcard>>,
    #[serde(default)]
    pub quiz: Option<Vec<QuizQuestionRecord>>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub slides_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl LectureRecord {
    pub fn into_lecture(self) -> Result<Lecture> {
        let raw_notes = self.notes.unwrap_or_default();
        let quiz = convert_quiz(self.quiz.unwrap_or_default())?;

        Ok(Lecture {
            id: self.id.to_string(),
            title: self.title.unwrap_or_default(),
            status: self.status,
            notes: parse_notes(&raw_notes),
            raw_notes,
            transcript: self.transcript.unwrap_or_default(),
            flashcards: self.flashcards.unwrap_or_default(),
            quiz,
            video_url: self.video_url,
            slides_url: self.slides_url,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LectureSummaryRecord {
    pub id: WireId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: LectureStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub flashcards_count: Option<usize>,
    #[serde(default)]
    pub quiz_count: Option<usize>,
    #[serde(default)]
    pub flashcards: Option<Vec<IgnoredAny>>,
    #[serde(default)]
    pub quiz: Option<Vec<IgnoredAny>>,
}

impl From<LectureSummaryRecord> for LectureSummary {
    fn from(record: LectureSummaryRecord) -> Self {
        LectureSummary {
            id: record.id.to_string(),
            title: record.title.unwrap_or_default(),
            status: record.status,
            created_at: record.created_at.as_deref().and_then(parse_timestamp),
            flashcards_count: record
                .flashcards_count
                .or(record.flashcards.map(|c| c.len()))
                .unwrap_or(0),
            quiz_count: record
                .quiz_count
                .or(record.quiz.map(|q| q.len()))
                .unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LectureListEnvelope {
    #[serde(default)]
    pub lectures: Vec<LectureSummaryRecord>,
}

#[derive(Debug, Deserialize)]
pub struct FlashcardsEnvelope {
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
pub struct QuizEnvelope {
    #[serde(default)]
    pub quiz: Vec<QuizQuestionRecord>,
}

#[derive(Debug, Deserialize)]
pub struct UploadReceiptRecord {
    pub lecture_id: WireId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<UploadReceiptRecord> for UploadReceipt {
    fn from(record: UploadReceiptRecord) -> Self {
        UploadReceipt {
            lecture_id: record.lecture_id.to_string(),
            status: record.status.unwrap_or_default(),
            message: record.message.unwrap_or_default(),
        }
    }
}

/// FastAPI-style error body; `detail` is a string or a list of validation errors.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
