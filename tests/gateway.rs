use axum::{
    Json, Router,
    extract::{Multipart, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lecture_study::{
    HttpGateway, LectureFilter, LectureGateway, LectureStatus, NoteBlock, StudyError,
    UploadRequest,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

const KNOWN_ID: &str = "6f1c2d7e-0000-4000-8000-000000000001";

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Lecture not found" })),
    )
        .into_response()
}

fn lecture_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Intro to Graphs",
        "status": "completed",
        "transcript": "Today we talk about graphs.",
        "notes": "## Basics\n- a graph has vertices\n\nEdges connect **vertices**.",
        "flashcards": [
            { "question": "2+2?", "answer": "4" },
            { "question": "Capital of France?", "answer": "Paris" }
        ],
        "quiz": [
            {
                "question": "X",
                "options": { "A": "1", "B": "2" },
                "correct_answer": "B"
            }
        ],
        "video_url": "/uploads/intro.mp4",
        "slides_url": null,
        "created_at": "2024-05-01T10:30:00"
    })
}

async fn get_lecture(Path(id): Path<String>) -> Response {
    match id.as_str() {
        KNOWN_ID => Json(lecture_json(KNOWN_ID)).into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbled" => (StatusCode::OK, "{ not json").into_response(),
        "bad-quiz" => {
            let mut record = lecture_json("bad-quiz");
            record["quiz"][0]["correct_answer"] = json!("Z");
            Json(record).into_response()
        }
        _ => not_found(),
    }
}

async fn delete_lecture(Path(id): Path<String>) -> Response {
    if id == KNOWN_ID {
        Json(json!({ "message": "Lecture deleted successfully" })).into_response()
    } else {
        not_found()
    }
}

async fn list_lectures(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let all = vec![
        json!({ "id": "a", "title": "Intro to Graphs", "status": "completed",
                "created_at": "2024-05-01T10:30:00",
                "flashcards": [{ "question": "q", "answer": "a" }], "quiz": [] }),
        json!({ "id": "b", "title": "Linear Algebra", "status": "processing",
                "flashcards_count": 4, "quiz_count": 2 }),
        json!({ "id": 7, "title": "Graph Coloring", "status": null }),
    ];
    let lectures: Vec<Value> = all.into_iter().skip(offset).take(limit).collect();
    let total = lectures.len();
    Json(json!({ "lectures": lectures, "total": total }))
}

async fn flashcards(Path(id): Path<String>) -> Response {
    if id != KNOWN_ID {
        return not_found();
    }
    Json(json!({
        "lecture_id": id,
        "flashcards": [{ "q": "Short?", "a": "Yes" }]
    }))
    .into_response()
}

async fn quiz(Path(id): Path<String>) -> Response {
    if id != KNOWN_ID {
        return not_found();
    }
    Json(json!({
        "lecture_id": id,
        "quiz": [{ "question": "Pick two", "options": ["one", "two", "three"], "correct_answer": 1 }]
    }))
    .into_response()
}

async fn upload(mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap();
        fields.insert(name, data);
    }
    let title = fields
        .get("title")
        .map(|t| String::from_utf8_lossy(t).to_string())
        .unwrap_or_default();
    if title == "reject me" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Unsupported video format" })),
        )
            .into_response();
    }
    if !fields.contains_key("video") {
        return (StatusCode::UNPROCESSABLE_ENTITY, "missing video").into_response();
    }
    Json(json!({
        "lecture_id": "new-lecture",
        "status": "uploaded",
        "message": format!("received {} with {} parts", title, fields.len())
    }))
    .into_response()
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/upload", post(upload))
        .route("/api/lectures", get(list_lectures))
        .route("/api/lectures/{id}", get(get_lecture).delete(delete_lecture))
        .route("/api/lectures/{id}/flashcards", get(flashcards))
        .route("/api/lectures/{id}/quiz", get(quiz));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn gateway() -> HttpGateway {
    let base = spawn_backend().await;
    HttpGateway::new(&base, Some(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn test_fetch_lecture_maps_record() {
    let gateway = gateway().await;
    let lecture = gateway.fetch_lecture(KNOWN_ID).await.unwrap();

    assert_eq!(lecture.id, KNOWN_ID);
    assert_eq!(lecture.status, LectureStatus::Completed);
    assert_eq!(lecture.flashcards.len(), 2);
    assert_eq!(lecture.flashcards[1].answer, "Paris");
    assert_eq!(lecture.quiz[0].correct_answer(), "B");
    assert_eq!(lecture.quiz[0].options()[0].text, "1");
    assert_eq!(
        lecture.notes,
        vec![
            NoteBlock::Heading("Basics".into()),
            NoteBlock::Bullet("a graph has vertices".into()),
            NoteBlock::Paragraph("Edges connect **vertices**.".into()),
        ]
    );
    assert!(lecture.created_at.is_some());
    assert_eq!(lecture.slides_url, None);
}

#[tokio::test]
async fn test_fetch_lecture_not_found() {
    let gateway = gateway().await;
    let err = gateway.fetch_lecture("missing").await.unwrap_err();
    assert!(matches!(err, StudyError::NotFound(id) if id == "missing"));
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let gateway = gateway().await;
    let err = gateway.fetch_lecture("broken").await.unwrap_err();
    assert!(matches!(err, StudyError::Network(_)));
}

#[tokio::test]
async fn test_malformed_records_are_invalid() {
    let gateway = gateway().await;
    assert!(matches!(
        gateway.fetch_lecture("garbled").await.unwrap_err(),
        StudyError::InvalidRecord(_)
    ));
    assert!(matches!(
        gateway.fetch_lecture("bad-quiz").await.unwrap_err(),
        StudyError::InvalidRecord(_)
    ));
}

#[tokio::test]
async fn test_delete_lecture() {
    let gateway = gateway().await;
    gateway.delete_lecture(KNOWN_ID).await.unwrap();
    assert!(matches!(
        gateway.delete_lecture("missing").await.unwrap_err(),
        StudyError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_list_lectures_with_counts_and_paging() {
    let gateway = gateway().await;
    let listing = gateway.list_lectures(&LectureFilter::default()).await;
    assert!(listing.error.is_none());
    assert_eq!(listing.lectures.len(), 3);

    let a = &listing.lectures[0];
    assert_eq!((a.flashcards_count, a.quiz_count), (1, 0));
    let b = &listing.lectures[1];
    assert_eq!(b.status, LectureStatus::Processing);
    assert_eq!((b.flashcards_count, b.quiz_count), (4, 2));
    assert_eq!(listing.lectures[2].id, "7");
    assert_eq!(listing.lectures[2].status, LectureStatus::Processing);

    let page = gateway
        .list_lectures(&LectureFilter {
            query: None,
            limit: 1,
            offset: 1,
        })
        .await;
    assert_eq!(page.lectures.len(), 1);
    assert_eq!(page.lectures[0].id, "b");
}

#[tokio::test]
async fn test_list_lectures_title_filter() {
    let gateway = gateway().await;
    let listing = gateway
        .list_lectures(&LectureFilter {
            query: Some("GRAPH".into()),
            ..LectureFilter::default()
        })
        .await;
    let ids: Vec<&str> = listing.lectures.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "7"]);
}

#[tokio::test]
async fn test_list_lectures_unreachable_is_empty_with_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let gateway =
        HttpGateway::new(&format!("http://127.0.0.1:{}", port), Some(Duration::from_secs(5)))
            .unwrap();

    let listing = gateway.list_lectures(&LectureFilter::default()).await;
    assert!(listing.lectures.is_empty());
    assert!(matches!(listing.error, Some(StudyError::Network(_))));

    assert!(matches!(
        gateway.fetch_lecture("any").await.unwrap_err(),
        StudyError::Network(_)
    ));
}

#[tokio::test]
async fn test_regenerate_endpoints() {
    let gateway = gateway().await;

    let cards = gateway.regenerate_flashcards(KNOWN_ID).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].question, "Short?");

    let quiz = gateway.regenerate_quiz(KNOWN_ID).await.unwrap();
    assert_eq!(quiz[0].correct_answer(), "B");
    assert_eq!(quiz[0].option("B").unwrap().text, "two");

    assert!(matches!(
        gateway.regenerate_quiz("missing").await.unwrap_err(),
        StudyError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_upload_sends_multipart() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("lecture.mp4");
    let slides = dir.path().join("slides.pdf");
    std::fs::write(&video, b"not really a video").unwrap();
    std::fs::write(&slides, b"%PDF-1.4").unwrap();

    let gateway = gateway().await;
    let receipt = gateway
        .upload_lecture(&UploadRequest {
            title: "  Week 3  ".into(),
            video: Some(video.clone()),
            slides: Some(slides),
        })
        .await
        .unwrap();
    assert_eq!(receipt.lecture_id, "new-lecture");
    assert_eq!(receipt.status, "uploaded");
    assert_eq!(receipt.message, "received Week 3 with 3 parts");

    let err = gateway
        .upload_lecture(&UploadRequest {
            title: "reject me".into(),
            video: Some(video),
            slides: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::Validation(msg) if msg == "Unsupported video format"));
}

#[tokio::test]
async fn test_upload_validation_happens_before_sending() {
    // Nothing listens here; a request would fail with a network error.
    let gateway = HttpGateway::new("http://127.0.0.1:9", None).unwrap();
    let err = gateway
        .upload_lecture(&UploadRequest {
            title: String::new(),
            video: None,
            slides: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::Validation(_)));
}
