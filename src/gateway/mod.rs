pub mod client;
pub mod wire;

use crate::error::Result;
use crate::models::{
    Flashcard, Lecture, LectureFilter, LectureListing, QuizQuestion, UploadReceipt, UploadRequest,
};
use async_trait::async_trait;

pub use client::{DEFAULT_API_BASE, HttpGateway, error_for_status};

/// Boundary to the lecture backend. One call is one request: no caching, no retries.
#[async_trait]
pub trait LectureGateway: Send + Sync {
    async fn fetch_lecture(&self, id: &str) -> Result<Lecture>;

    async fn delete_lecture(&self, id: &str) -> Result<()>;

    /// Never fails outright; see [`LectureListing`].
    async fn list_lectures(&self, filter: &LectureFilter) -> LectureListing;

    async fn upload_lecture(&self, request: &UploadRequest) -> Result<UploadReceipt>;

    async fn regenerate_flashcards(&self, id: &str) -> Result<Vec<Flashcard>>;

    async fn regenerate_quiz(&self, id: &str) -> Result<Vec<QuizQuestion>>;
}
