use super::LectureGateway;
use super::wire::{
    FlashcardsEnvelope, LectureListEnvelope, LectureRecord, QuizEnvelope, UploadReceiptRecord,
    convert_quiz, error_detail,
};
use crate::error::{Result, StudyError};
use crate::models::{
    Flashcard, Lecture, LectureFilter, LectureListing, LectureSummary, QuizQuestion,
    UploadReceipt, UploadRequest,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode, Url};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Map a non-success status to the error the screens know how to show.
pub fn error_for_status(status: StatusCode, body: &str, subject: &str) -> StudyError {
    let detail = error_detail(body);
    match status {
        StatusCode::NOT_FOUND => StudyError::NotFound(subject.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StudyError::Validation(
            detail.unwrap_or_else(|| format!("request rejected ({})", status)),
        ),
        _ => StudyError::Network(match detail {
            Some(d) => format!("server returned {}: {}", status, d),
            None => format!("server returned {}", status),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StudyError::Validation(format!("invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StudyError::Validation(format!(
                "invalid API URL '{}'",
                base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StudyError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn lecture_endpoint(&self, id: &str, tail: Option<&str>) -> Url {
        match tail {
            Some(tail) => self.endpoint(&["api", "lectures", id, tail]),
            None => self.endpoint(&["api", "lectures", id]),
        }
    }

    async fn checked(response: Response, subject: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::warn!("{} -> {}", subject, status);
        Err(error_for_status(status, &body, subject))
    }

    async fn fetch_listing(&self, filter: &LectureFilter) -> Result<Vec<LectureSummary>> {
        let mut url = self.endpoint(&["api", "lectures"]);
        url.query_pairs_mut()
            .append_pair("limit", &filter.limit.to_string())
            .append_pair("offset", &filter.offset.to_string());

        let response = self.client.get(url).send().await?;
        let envelope: LectureListEnvelope = Self::checked(response, "lecture list")
            .await?
            .json()
            .await?;

        let query = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());
        Ok(envelope
            .lectures
            .into_iter()
            .map(LectureSummary::from)
            .filter(|summary| query.is_none_or(|q| summary.matches(q)))
            .collect())
    }
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

#[async_trait]
impl LectureGateway for HttpGateway {
    async fn fetch_lecture(&self, id: &str) -> Result<Lecture> {
        log::debug!("fetching lecture {}", id);
        let response = self
            .client
            .get(self.lecture_endpoint(id, None))
            .send()
            .await?;
        let record: LectureRecord = Self::checked(response, id).await?.json().await?;
        record.into_lecture()
    }

    async fn delete_lecture(&self, id: &str) -> Result<()> {
        log::info!("deleting lecture {}", id);
        let response = self
            .client
            .delete(self.lecture_endpoint(id, None))
            .send()
            .await?;
        Self::checked(response, id).await?;
        Ok(())
    }

    async fn list_lectures(&self, filter: &LectureFilter) -> LectureListing {
        match self.fetch_listing(filter).await {
            Ok(lectures) => LectureListing {
                lectures,
                error: None,
            },
            Err(e) => {
                log::warn!("listing lectures failed: {}", e);
                LectureListing::failed(e)
            }
        }
    }

    async fn upload_lecture(&self, request: &UploadRequest) -> Result<UploadReceipt> {
        request.validate()?;
        let video = request
            .video
            .as_deref()
            .ok_or_else(|| StudyError::Validation("Video file is required".into()))?;

        let mut form = Form::new()
            .text("title", request.title.trim().to_string())
            .part("video", file_part(video).await?);
        if let Some(slides) = &request.slides {
            form = form.part("slides", file_part(slides).await?);
        }

        log::info!("uploading lecture '{}'", request.title.trim());
        let response = self
            .client
            .post(self.endpoint(&["api", "upload"]))
            .multipart(form)
            .send()
            .await?;
        let record: UploadReceiptRecord = Self::checked(response, "upload").await?.json().await?;
        Ok(record.into())
    }

    async fn regenerate_flashcards(&self, id: &str) -> Result<Vec<Flashcard>> {
        let response = self
            .client
            .get(self.lecture_endpoint(id, Some("flashcards")))
            .send()
            .await?;
        let envelope: FlashcardsEnvelope = Self::checked(response, id).await?.json().await?;
        Ok(envelope.flashcards)
    }

    async fn regenerate_quiz(&self, id: &str) -> Result<Vec<QuizQuestion>> {
        let response = self
            .client
            .get(self.lecture_endpoint(id, Some("quiz")))
            .send()
            .await?;
        let envelope: QuizEnvelope = Self::checked(response, id).await?.json().await?;
        convert_quiz(envelope.quiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "", "abc"),
            StudyError::NotFound(id) if id == "abc"
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST, r#"{"detail":"Title is required"}"#, "upload"),
            StudyError::Validation(msg) if msg == "Title is required"
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "", "abc"),
            StudyError::Network(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::SERVICE_UNAVAILABLE, "oops", "abc"),
            StudyError::Network(_)
        ));
    }

    #[test]
    fn test_endpoints_join_base_path() {
        let gateway = HttpGateway::new("http://example.test/backend/", None).unwrap();
        assert_eq!(
            gateway.lecture_endpoint("a b", Some("quiz")).as_str(),
            "http://example.test/backend/api/lectures/a%20b/quiz"
        );

        let gateway = HttpGateway::new(DEFAULT_API_BASE, None).unwrap();
        assert_eq!(
            gateway.endpoint(&["api", "upload"]).as_str(),
            "http://localhost:8000/api/upload"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            HttpGateway::new("not a url", None).unwrap_err(),
            StudyError::Validation(_)
        ));
        assert!(HttpGateway::new("mailto:someone@example.test", None).is_err());
    }
}
