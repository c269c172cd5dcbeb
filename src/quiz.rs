use crate::error::{Result, StudyError};
use crate::models::QuizQuestion;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Great,
    Good,
    KeepPracticing,
}

impl GradeBand {
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            GradeBand::Great
        } else if percentage >= 60 {
            GradeBand::Good
        } else {
            GradeBand::KeepPracticing
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GradeBand::Great => "Great job!",
            GradeBand::Good => "Good effort!",
            GradeBand::KeepPracticing => "Keep practicing!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub index: usize,
    pub chosen: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub outcomes: Vec<QuestionOutcome>,
}

impl QuizScore {
    /// `round(100 * correct / total)` with halves rounded up; 0 for an empty quiz.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((200 * self.correct + self.total) / (2 * self.total)) as u32
    }

    pub fn band(&self) -> GradeBand {
        GradeBand::for_percentage(self.percentage())
    }
}

/// Score a set of answers. Pure: depends only on the questions and the answer map.
pub fn grade(questions: &[QuizQuestion], answers: &BTreeMap<usize, String>) -> QuizScore {
    let outcomes: Vec<QuestionOutcome> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let chosen = answers.get(&index).cloned();
            let is_correct = chosen
                .as_deref()
                .is_some_and(|key| question.is_correct(key));
            QuestionOutcome {
                index,
                chosen,
                correct_answer: question.correct_answer().to_string(),
                is_correct,
            }
        })
        .collect();

    QuizScore {
        correct: outcomes.iter().filter(|o| o.is_correct).count(),
        total: questions.len(),
        outcomes,
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    total: usize,
    answers: BTreeMap<usize, String>,
    state: QuizState,
    elapsed_seconds: u64,
    score: Option<QuizScore>,
}

impl QuizSession {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            answers: BTreeMap::new(),
            state: QuizState::NotStarted,
            elapsed_seconds: 0,
            score: None,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == self.total
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn score(&self) -> Option<&QuizScore> {
        self.score.as_ref()
    }

    /// Record `key` as the answer to question `index`.
    ///
    /// The first selection starts the quiz and its timer. Selections after
    /// submission are ignored.
    pub fn select_answer(
        &mut self,
        questions: &[QuizQuestion],
        index: usize,
        key: &str,
    ) -> Result<()> {
        if self.state == QuizState::Submitted {
            log::debug!("ignoring answer for question {} after submission", index);
            return Ok(());
        }

        let question = questions.get(index).ok_or(StudyError::OutOfRange {
            index,
            len: questions.len(),
        })?;
        if !question.has_option(key) {
            return Err(StudyError::UnknownOption {
                question: index,
                key: key.to_string(),
            });
        }

        if self.state == QuizState::NotStarted {
            log::info!("quiz started ({} questions)", self.total);
            self.state = QuizState::InProgress;
        }

        if self.answer_for(index) != Some(key) {
            self.answers.insert(index, key.to_string());
        }
        Ok(())
    }

    /// One-second timer hook; only counts while the quiz is in progress.
    pub fn tick(&mut self) {
        if self.state == QuizState::InProgress {
            self.elapsed_seconds += 1;
        }
    }

    pub fn submit(&mut self, questions: &[QuizQuestion]) -> Result<&QuizScore> {
        if self.state != QuizState::Submitted {
            if !self.is_complete() {
                return Err(StudyError::IncompleteAnswers {
                    answered: self.answered_count(),
                    total: self.total,
                });
            }

            let score = grade(questions, &self.answers);
            log::info!(
                "quiz submitted: {}/{} correct in {}s",
                score.correct,
                score.total,
                self.elapsed_seconds
            );
            self.score = Some(score);
            self.state = QuizState::Submitted;
        }

        self.score
            .as_ref()
            .ok_or_else(|| StudyError::InvalidRecord("submitted quiz has no score".into()))
    }

    /// Submitted -> NotStarted. Returns whether a retake happened.
    pub fn retake(&mut self) -> bool {
        if self.state != QuizState::Submitted {
            return false;
        }
        self.restart();
        true
    }

    /// Drops answers and timer of a quiz still being taken.
    pub fn clear_answers(&mut self) -> bool {
        if self.state != QuizState::InProgress {
            return false;
        }
        self.restart();
        true
    }

    fn restart(&mut self) {
        self.answers.clear();
        self.state = QuizState::NotStarted;
        self.elapsed_seconds = 0;
        self.score = None;
    }
}
