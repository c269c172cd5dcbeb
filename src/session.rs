use crate::deck::DeckNavigator;
use crate::error::StudyError;
use crate::file_io::save_export;
use crate::models::{
    AppState, GatewayCall, GatewayResponse, Lecture, LectureFilter, LectureListing,
    LectureSummary, UploadRequest,
};
use crate::quiz::{QuizSession, QuizState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Inline text for an error caught at a view boundary.
pub fn error_message(error: &StudyError) -> String {
    match error {
        StudyError::NotFound(_) => "Lecture not found".to_string(),
        StudyError::Network(detail) => format!("Network error: {}", detail),
        other => format!("{}: {}", other.kind(), other),
    }
}

/// Which view is waiting on a request. Responses for anyone else are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waiter {
    Listing,
    Delete,
    Upload,
    Lecture,
    Regenerate,
}

impl Waiter {
    pub fn for_call(call: &GatewayCall) -> Self {
        match call {
            GatewayCall::ListLectures { .. } => Waiter::Listing,
            GatewayCall::DeleteLecture { .. } => Waiter::Delete,
            GatewayCall::Upload { .. } => Waiter::Upload,
            GatewayCall::FetchLecture { .. } => Waiter::Lecture,
            GatewayCall::RegenerateFlashcards { .. } | GatewayCall::RegenerateQuiz { .. } => {
                Waiter::Regenerate
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct LibraryView {
    pub lectures: Vec<LectureSummary>,
    pub error: Option<String>,
    pub status: Option<String>,
    pub query: String,
    pub searching: bool,
    pub selected: usize,
    pub delete_target: Option<LectureSummary>,
    pending_listing: Option<u64>,
    pending_deletes: BTreeSet<u64>,
}

impl LibraryView {
    pub fn is_loading(&self) -> bool {
        self.pending_listing.is_some()
    }

    pub fn is_deleting(&self) -> bool {
        !self.pending_deletes.is_empty()
    }

    pub fn visible(&self) -> Vec<&LectureSummary> {
        let query = self.query.trim();
        self.lectures
            .iter()
            .filter(|l| query.is_empty() || l.matches(query))
            .collect()
    }

    pub fn selected_lecture(&self) -> Option<&LectureSummary> {
        self.visible().get(self.selected).copied()
    }

    /// (lectures, flashcards, quiz questions) over the visible rows.
    pub fn totals(&self) -> (usize, usize, usize) {
        self.visible().iter().fold((0, 0, 0), |(n, f, q), l| {
            (n + 1, f + l.flashcards_count, q + l.quiz_count)
        })
    }

    pub fn empty_message(&self) -> &'static str {
        if self.lectures.is_empty() && self.query.trim().is_empty() {
            "No lectures yet. Press u to upload one."
        } else {
            "No lectures found"
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn apply_listing(&mut self, listing: LectureListing) {
        self.lectures = listing.lectures;
        self.error = listing.error.as_ref().map(error_message);
        self.clamp_selection();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadField {
    #[default]
    Title,
    Video,
    Slides,
}

impl UploadField {
    fn next(self) -> Self {
        match self {
            UploadField::Title => UploadField::Video,
            UploadField::Video => UploadField::Slides,
            UploadField::Slides => UploadField::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            UploadField::Title => UploadField::Slides,
            UploadField::Video => UploadField::Title,
            UploadField::Slides => UploadField::Video,
        }
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub title: String,
    pub video: String,
    pub slides: String,
    pub field: UploadField,
    pub error: Option<String>,
    pending: Option<u64>,
}

impl UploadForm {
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            UploadField::Title => &mut self.title,
            UploadField::Video => &mut self.video,
            UploadField::Slides => &mut self.slides,
        }
    }

    pub fn request(&self) -> UploadRequest {
        let path = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| PathBuf::from(s))
        };
        UploadRequest {
            title: self.title.clone(),
            video: path(&self.video),
            slides: path(&self.slides),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LectureTab {
    Notes,
    Flashcards,
    Quiz,
}

impl LectureTab {
    fn next(self) -> Self {
        match self {
            LectureTab::Notes => LectureTab::Flashcards,
            LectureTab::Flashcards => LectureTab::Quiz,
            LectureTab::Quiz => LectureTab::Notes,
        }
    }
}

/// Everything one open lecture needs. Dropped when the view closes, which
/// also orphans any request it was still waiting on.
#[derive(Debug)]
pub struct LectureView {
    pub id: String,
    pub title: String,
    pub lecture: Option<Arc<Lecture>>,
    pub error: Option<String>,
    pub status: Option<String>,
    pub tab: LectureTab,
    pub deck: DeckNavigator,
    pub quiz: QuizSession,
    pub question_cursor: usize,
    pub notes_scroll: u16,
    pub jump_input: Option<String>,
    pending_load: Option<u64>,
    pending_regenerate: Option<u64>,
}

impl LectureView {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            lecture: None,
            error: None,
            status: None,
            tab: LectureTab::Notes,
            deck: DeckNavigator::default(),
            quiz: QuizSession::new(0),
            question_cursor: 0,
            notes_scroll: 0,
            jump_input: None,
            pending_load: None,
            pending_regenerate: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn is_regenerating(&self) -> bool {
        self.pending_regenerate.is_some()
    }

    pub fn set_lecture(&mut self, lecture: Lecture) {
        self.title = lecture.title.clone();
        self.deck = DeckNavigator::new(lecture.flashcards.len());
        self.quiz = QuizSession::new(lecture.quiz.len());
        self.question_cursor = 0;
        self.error = None;
        self.lecture = Some(Arc::new(lecture));
    }

    pub fn set_tab(&mut self, tab: LectureTab) {
        if self.tab != tab {
            self.tab = tab;
            self.deck.reset();
            self.jump_input = None;
            self.status = None;
        }
    }

    fn replace_with(&mut self, update: impl FnOnce(&mut Lecture)) {
        if let Some(current) = &self.lecture {
            let mut lecture = (**current).clone();
            update(&mut lecture);
            self.lecture = Some(Arc::new(lecture));
        }
    }
}

pub struct App {
    pub state: AppState,
    pub library: LibraryView,
    pub upload: UploadForm,
    pub lecture: Option<LectureView>,
    pub export_dir: PathBuf,
    pub list_limit: usize,
    pub should_quit: bool,
    outbox: Vec<GatewayCall>,
}

impl App {
    pub fn new(export_dir: PathBuf, list_limit: usize) -> Self {
        let mut app = Self {
            state: AppState::Library,
            library: LibraryView::default(),
            upload: UploadForm::default(),
            lecture: None,
            export_dir,
            list_limit,
            should_quit: false,
            outbox: Vec::new(),
        };
        app.reload_library();
        app
    }

    /// Calls queued since the last drain, in order.
    pub fn take_outbox(&mut self) -> Vec<GatewayCall> {
        std::mem::take(&mut self.outbox)
    }

    /// Remember which ticket a view is now waiting on.
    pub fn track(&mut self, waiter: Waiter, ticket: u64) {
        match waiter {
            Waiter::Listing => self.library.pending_listing = Some(ticket),
            Waiter::Delete => {
                self.library.pending_deletes.insert(ticket);
            }
            Waiter::Upload => self.upload.pending = Some(ticket),
            Waiter::Lecture => {
                if let Some(view) = &mut self.lecture {
                    view.pending_load = Some(ticket);
                }
            }
            Waiter::Regenerate => {
                if let Some(view) = &mut self.lecture {
                    view.pending_regenerate = Some(ticket);
                }
            }
        }
    }

    /// The worker could not take the call; show it where the user is looking.
    pub fn dispatch_failed(&mut self, waiter: Waiter) {
        let message = "Network error: background worker is not running".to_string();
        match waiter {
            Waiter::Listing | Waiter::Delete => self.library.error = Some(message),
            Waiter::Upload => self.upload.error = Some(message),
            Waiter::Lecture | Waiter::Regenerate => {
                if let Some(view) = &mut self.lecture {
                    if view.lecture.is_some() {
                        view.status = Some(message);
                    } else {
                        view.error = Some(message);
                    }
                }
            }
        }
    }

    pub fn reload_library(&mut self) {
        let query = self.library.query.trim();
        self.outbox.push(GatewayCall::ListLectures {
            filter: LectureFilter {
                query: (!query.is_empty()).then(|| query.to_string()),
                ..LectureFilter::with_limit(self.list_limit)
            },
        });
    }

    pub fn open_lecture(&mut self, id: &str, title: &str) {
        log::info!("opening lecture {}", id);
        self.lecture = Some(LectureView::new(id, title));
        self.state = AppState::Lecture;
        self.outbox.push(GatewayCall::FetchLecture { id: id.to_string() });
    }

    fn close_lecture(&mut self) {
        self.lecture = None;
        self.state = AppState::Library;
        self.reload_library();
    }

    /// One-second timer hook from the event loop.
    pub fn tick(&mut self) {
        if let Some(view) = &mut self.lecture {
            view.quiz.tick();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.state {
            AppState::Library => self.handle_library_key(key),
            AppState::DeleteConfirm => self.handle_delete_key(key),
            AppState::Upload => self.handle_upload_key(key),
            AppState::Lecture => self.handle_lecture_key(key),
        }
    }

    fn handle_library_key(&mut self, key: KeyEvent) {
        let library = &mut self.library;
        if library.searching {
            match key.code {
                KeyCode::Char(c) => {
                    library.query.push(c);
                    library.selected = 0;
                }
                KeyCode::Backspace => {
                    library.query.pop();
                    library.selected = 0;
                }
                KeyCode::Esc => {
                    library.query.clear();
                    library.searching = false;
                    library.selected = 0;
                }
                KeyCode::Enter => library.searching = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                library.selected = library.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if library.selected + 1 < library.visible().len() {
                    library.selected += 1;
                }
            }
            KeyCode::Char('/') => library.searching = true,
            KeyCode::Enter => {
                if let Some(summary) = library.selected_lecture() {
                    let (id, title) = (summary.id.clone(), summary.title.clone());
                    self.open_lecture(&id, &title);
                }
            }
            KeyCode::Char('d') => {
                if let Some(summary) = library.selected_lecture().cloned() {
                    library.delete_target = Some(summary);
                    self.state = AppState::DeleteConfirm;
                }
            }
            KeyCode::Char('r') => {
                library.status = None;
                self.reload_library();
            }
            KeyCode::Char('u') => {
                self.upload = UploadForm::default();
                self.state = AppState::Upload;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_delete_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(target) = &self.library.delete_target {
                    self.outbox.push(GatewayCall::DeleteLecture {
                        id: target.id.clone(),
                    });
                    self.library.status = Some(format!("Deleting '{}'...", target.title));
                }
                self.state = AppState::Library;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.library.delete_target = None;
                self.state = AppState::Library;
            }
            _ => {}
        }
    }

    fn handle_upload_key(&mut self, key: KeyEvent) {
        let form = &mut self.upload;
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Library;
            }
            KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
            KeyCode::BackTab | KeyCode::Up => form.field = form.field.previous(),
            KeyCode::Backspace => {
                form.active_mut().pop();
            }
            KeyCode::Char(c) => form.active_mut().push(c),
            KeyCode::Enter => {
                if form.is_submitting() {
                    return;
                }
                let request = form.request();
                match request.validate() {
                    Ok(()) => {
                        form.error = None;
                        self.outbox.push(GatewayCall::Upload { request });
                    }
                    Err(e) => form.error = Some(error_message(&e)),
                }
            }
            _ => {}
        }
    }

    fn handle_lecture_key(&mut self, key: KeyEvent) {
        let Some(view) = &mut self.lecture else {
            self.state = AppState::Library;
            return;
        };

        if let Some(input) = &mut view.jump_input {
            match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let target = input.parse::<usize>().ok();
                    view.jump_input = None;
                    match target {
                        Some(n) if n > 0 => {
                            if let Err(e) = view.deck.jump_to(n - 1) {
                                view.status = Some(error_message(&e));
                            }
                        }
                        _ => view.status = Some("Enter a card number".to_string()),
                    }
                }
                KeyCode::Esc => view.jump_input = None,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.close_lecture();
                return;
            }
            KeyCode::Char('1') => view.set_tab(LectureTab::Notes),
            KeyCode::Char('2') => view.set_tab(LectureTab::Flashcards),
            KeyCode::Char('3') => view.set_tab(LectureTab::Quiz),
            KeyCode::Tab => view.set_tab(view.tab.next()),
            KeyCode::F(5) => {
                let id = view.id.clone();
                self.outbox.push(GatewayCall::FetchLecture { id });
            }
            KeyCode::Char('R') => match view.tab {
                LectureTab::Flashcards => self.outbox.push(GatewayCall::RegenerateFlashcards {
                    id: view.id.clone(),
                }),
                LectureTab::Quiz => self.outbox.push(GatewayCall::RegenerateQuiz {
                    id: view.id.clone(),
                }),
                LectureTab::Notes => {
                    view.status = Some("Switch to Flashcards or Quiz to regenerate".to_string())
                }
            },
            _ => {
                let Some(lecture) = view.lecture.clone() else {
                    return;
                };
                match view.tab {
                    LectureTab::Notes => handle_notes_key(view, key),
                    LectureTab::Flashcards => {
                        handle_flashcards_key(view, &lecture, key, &self.export_dir)
                    }
                    LectureTab::Quiz => handle_quiz_key(view, &lecture, key),
                }
            }
        }
    }

    /// Apply a worker response; anything no view is waiting on is dropped.
    pub fn handle_response(&mut self, response: GatewayResponse) {
        let ticket = response.ticket();
        match response {
            GatewayResponse::Listing { listing, .. } => {
                if self.library.pending_listing != Some(ticket) {
                    return stale(ticket);
                }
                self.library.pending_listing = None;
                self.library.apply_listing(listing);
            }
            GatewayResponse::Deleted { id, result, .. } => {
                let library = &mut self.library;
                if !library.pending_deletes.remove(&ticket) {
                    return stale(ticket);
                }
                if library.delete_target.as_ref().is_some_and(|t| t.id == id) {
                    library.delete_target = None;
                }
                match result {
                    Ok(()) => {
                        library.lectures.retain(|l| l.id != id);
                        library.clamp_selection();
                        library.status = Some("Lecture deleted".to_string());
                        library.error = None;
                    }
                    Err(e) => {
                        library.status = None;
                        library.error = Some(error_message(&e));
                    }
                }
            }
            GatewayResponse::Uploaded { result, .. } => {
                if self.upload.pending != Some(ticket) {
                    return stale(ticket);
                }
                self.upload.pending = None;
                match result {
                    Ok(receipt) => {
                        log::info!(
                            "upload accepted: {} ({})",
                            receipt.lecture_id,
                            receipt.status
                        );
                        let title = self.upload.title.trim().to_string();
                        self.upload = UploadForm::default();
                        self.open_lecture(&receipt.lecture_id, &title);
                        if let Some(view) = &mut self.lecture
                            && !receipt.message.is_empty()
                        {
                            view.status = Some(receipt.message);
                        }
                    }
                    Err(e) => self.upload.error = Some(error_message(&e)),
                }
            }
            GatewayResponse::Lecture { result, .. } => {
                let Some(view) = self
                    .lecture
                    .as_mut()
                    .filter(|v| v.pending_load == Some(ticket))
                else {
                    return stale(ticket);
                };
                view.pending_load = None;
                match result {
                    Ok(lecture) => view.set_lecture(lecture),
                    Err(e) if view.lecture.is_some() => {
                        view.status = Some(format!("Reload failed: {}", error_message(&e)))
                    }
                    Err(e) => view.error = Some(error_message(&e)),
                }
            }
            GatewayResponse::Flashcards { id, result, .. } => {
                let Some(view) = self
                    .lecture
                    .as_mut()
                    .filter(|v| v.pending_regenerate == Some(ticket) && v.id == id)
                else {
                    return stale(ticket);
                };
                view.pending_regenerate = None;
                match result {
                    Ok(cards) => {
                        view.status = Some(format!("Generated {} flashcards", cards.len()));
                        view.deck.reload(cards.len());
                        view.replace_with(|l| l.flashcards = cards);
                    }
                    Err(e) => view.status = Some(error_message(&e)),
                }
            }
            GatewayResponse::Quiz { id, result, .. } => {
                let Some(view) = self
                    .lecture
                    .as_mut()
                    .filter(|v| v.pending_regenerate == Some(ticket) && v.id == id)
                else {
                    return stale(ticket);
                };
                view.pending_regenerate = None;
                match result {
                    Ok(questions) => {
                        view.status = Some(format!("Generated {} questions", questions.len()));
                        view.quiz = QuizSession::new(questions.len());
                        view.question_cursor = 0;
                        view.replace_with(|l| l.quiz = questions);
                    }
                    Err(e) => view.status = Some(error_message(&e)),
                }
            }
        }
    }
}

fn stale(ticket: u64) {
    log::debug!("discarding stale response #{}", ticket);
}

fn handle_notes_key(view: &mut LectureView, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => view.notes_scroll = view.notes_scroll.saturating_add(1),
        KeyCode::Up | KeyCode::Char('k') => view.notes_scroll = view.notes_scroll.saturating_sub(1),
        _ => {}
    }
}

fn handle_flashcards_key(
    view: &mut LectureView,
    lecture: &Lecture,
    key: KeyEvent,
    export_dir: &std::path::Path,
) {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => view.deck.toggle_reveal(),
        KeyCode::Right | KeyCode::Char('l') => view.deck.next(),
        KeyCode::Left | KeyCode::Char('h') => view.deck.previous(),
        KeyCode::Char('g') => {
            if !view.deck.is_empty() {
                view.jump_input = Some(String::new());
            }
        }
        KeyCode::Char('e') => {
            if lecture.flashcards.is_empty() {
                view.status = Some("No flashcards to export".to_string());
                return;
            }
            view.status = Some(match save_export(export_dir, &lecture.title, &lecture.flashcards) {
                Ok(path) => format!(
                    "Exported {} cards to {}",
                    lecture.flashcards.len(),
                    path.display()
                ),
                Err(e) => error_message(&e),
            });
        }
        _ => {}
    }
}

fn handle_quiz_key(view: &mut LectureView, lecture: &Lecture, key: KeyEvent) {
    let questions = &lecture.quiz;

    if view.quiz.state() == QuizState::Submitted {
        match key.code {
            KeyCode::Char('r') => {
                view.quiz.retake();
                view.question_cursor = 0;
                view.status = None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if view.question_cursor + 1 < questions.len() {
                    view.question_cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                view.question_cursor = view.question_cursor.saturating_sub(1);
            }
            _ => {}
        }
        return;
    }

    let cursor = view.question_cursor;
    let result = match key.code {
        KeyCode::Down => {
            if cursor + 1 < questions.len() {
                view.question_cursor += 1;
            }
            Ok(())
        }
        KeyCode::Up => {
            view.question_cursor = cursor.saturating_sub(1);
            Ok(())
        }
        KeyCode::Left | KeyCode::Right => {
            let Some(question) = questions.get(cursor) else {
                return;
            };
            let options = question.options();
            let current = view
                .quiz
                .answer_for(cursor)
                .and_then(|k| options.iter().position(|o| o.key == k));
            let next = match (key.code, current) {
                (KeyCode::Right, Some(i)) => (i + 1).min(options.len() - 1),
                (KeyCode::Left, Some(i)) => i.saturating_sub(1),
                (KeyCode::Left, None) => options.len() - 1,
                _ => 0,
            };
            view.quiz.select_answer(questions, cursor, &options[next].key)
        }
        KeyCode::Char(c) if c.is_ascii_lowercase() => {
            let typed = c.to_string();
            let option_key = questions
                .get(cursor)
                .and_then(|q| {
                    q.options()
                        .iter()
                        .find(|o| o.key.eq_ignore_ascii_case(&typed))
                })
                .map(|o| o.key.clone())
                .unwrap_or_else(|| typed.to_ascii_uppercase());
            view.quiz.select_answer(questions, cursor, &option_key)
        }
        KeyCode::Enter => view.quiz.submit(questions).map(|_| ()),
        KeyCode::Backspace | KeyCode::Delete => {
            view.quiz.clear_answers();
            view.question_cursor = 0;
            Ok(())
        }
        _ => Ok(()),
    };

    view.status = result.err().map(|e| error_message(&e));
}
