use super::help_line;
use super::layout::calculate_lecture_chunks;
use super::library::status_style;
use crate::models::{Lecture, LectureStatus, QuizQuestion};
use crate::quiz::{QuizScore, QuizState};
use crate::session::{LectureTab, LectureView};
use crate::utils::{format_clock, format_duration, progress_dots, render_notes};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};

fn placeholder(f: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

pub fn draw_lecture(f: &mut Frame, view: &LectureView) {
    let layout = calculate_lecture_chunks(f.area());

    let mut header_spans = vec![Span::styled(
        view.title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(lecture) = &view.lecture {
        header_spans.push(Span::from("  "));
        header_spans.push(Span::styled(
            lecture.status.label(),
            status_style(lecture.status),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let (cards, questions) = view
        .lecture
        .as_ref()
        .map(|l| (l.flashcards.len(), l.quiz.len()))
        .unwrap_or((0, 0));
    let selected = match view.tab {
        LectureTab::Notes => 0,
        LectureTab::Flashcards => 1,
        LectureTab::Quiz => 2,
    };
    let tabs = Tabs::new(vec![
        "[1] Notes".to_string(),
        format!("[2] Flashcards ({})", cards),
        format!("[3] Quiz ({})", questions),
    ])
    .select(selected)
    .highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(tabs, layout.tabs_area);

    match (&view.lecture, &view.error) {
        (_, Some(error)) => {
            let widget = Paragraph::new(error.clone())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(widget, layout.body_area);
        }
        (None, None) => placeholder(f, layout.body_area, "Loading lecture..."),
        (Some(lecture), None) => match view.tab {
            LectureTab::Notes => draw_notes(f, layout.body_area, lecture, view.notes_scroll),
            LectureTab::Flashcards => draw_flashcards(f, layout.body_area, lecture, view),
            LectureTab::Quiz => draw_quiz(f, layout.body_area, lecture, view),
        },
    }

    let message = if let Some(input) = &view.jump_input {
        Line::from(vec![
            Span::styled("Go to card: ", Style::default().fg(Color::Cyan)),
            Span::from(format!("{}_", input)),
        ])
    } else if view.is_regenerating() {
        Line::from(Span::styled(
            "Regenerating...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(status) = &view.status {
        Line::from(Span::styled(status.clone(), Style::default().fg(Color::Yellow)))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(message), layout.message_area);

    let help = match view.tab {
        LectureTab::Notes => help_line(&[("1/2/3", "Tabs"), ("↑/↓", "Scroll"), ("F5", "Reload"), ("Esc", "Back")]),
        LectureTab::Flashcards => help_line(&[
            ("Space", "Flip"),
            ("←/→", "Prev/Next"),
            ("g", "Go to"),
            ("e", "Export"),
            ("R", "Regenerate"),
            ("Esc", "Back"),
        ]),
        LectureTab::Quiz if view.quiz.state() == QuizState::Submitted => help_line(&[
            ("↑/↓", "Review"),
            ("r", "Retake"),
            ("R", "Regenerate"),
            ("Esc", "Back"),
        ]),
        LectureTab::Quiz => help_line(&[
            ("↑/↓", "Question"),
            ("a-d/←/→", "Answer"),
            ("Enter", "Submit"),
            ("Bksp", "Clear"),
            ("Esc", "Back"),
        ]),
    };
    let help = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn draw_notes(f: &mut Frame, area: Rect, lecture: &Lecture, scroll: u16) {
    if lecture.notes.is_empty() {
        let text = match lecture.status {
            LectureStatus::Processing => "Notes are still being generated. Press F5 to refresh.",
            LectureStatus::Failed => "Processing failed for this lecture.",
            LectureStatus::Completed => "No notes available",
        };
        placeholder(f, area, text);
        return;
    }

    let notes = Paragraph::new(Text::from(render_notes(&lecture.notes)))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Notes"));
    f.render_widget(notes, area);
}

fn draw_flashcards(f: &mut Frame, area: Rect, lecture: &Lecture, view: &LectureView) {
    let (Some(card), Some((n, total))) = (
        view.deck.current(&lecture.flashcards),
        view.deck.position(),
    ) else {
        placeholder(f, area, "No flashcards available");
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let question = Paragraph::new(card.question.clone())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Card {} of {}", n, total)),
        );
    f.render_widget(question, chunks[0]);

    let answer = if view.deck.is_revealed() {
        Paragraph::new(card.answer.clone()).style(Style::default().fg(Color::Green))
    } else {
        Paragraph::new("Press Space to reveal the answer").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    };
    f.render_widget(
        answer
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Answer")),
        chunks[1],
    );

    let dots = progress_dots(view.deck.index(), total, chunks[2].width as usize / 2);
    f.render_widget(
        Paragraph::new(dots)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Cyan)),
        chunks[2],
    );
}

fn question_lines(
    number: usize,
    question: &QuizQuestion,
    chosen: Option<&str>,
    focused: bool,
) -> Vec<Line<'static>> {
    let marker = if focused { "▶ " } else { "  " };
    let mut lines = vec![Line::from(Span::styled(
        format!("{}{}. {}", marker, number, question.question),
        if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        },
    ))];
    for option in question.options() {
        let picked = chosen == Some(option.key.as_str());
        let style = if picked {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "     {} {}) {}",
                if picked { "●" } else { "○" },
                option.key,
                option.text
            ),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines
}

fn draw_quiz(f: &mut Frame, area: Rect, lecture: &Lecture, view: &LectureView) {
    if lecture.quiz.is_empty() && view.quiz.state() != QuizState::Submitted {
        placeholder(f, area, "No quiz questions available");
        return;
    }
    if let Some(score) = view.quiz.score() {
        draw_results(f, area, lecture, view, score);
        return;
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut cursor_line = 0;
    for (i, question) in lecture.quiz.iter().enumerate() {
        if i == view.question_cursor {
            cursor_line = lines.len();
        }
        lines.extend(question_lines(
            i + 1,
            question,
            view.quiz.answer_for(i),
            i == view.question_cursor,
        ));
    }

    let title = format!(
        "Answered {}/{} · {}",
        view.quiz.answered_count(),
        view.quiz.total(),
        format_clock(view.quiz.elapsed_seconds())
    );
    let quiz = Paragraph::new(Text::from(lines))
        .scroll((cursor_line as u16, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(quiz, area);
}

fn draw_results(f: &mut Frame, area: Rect, lecture: &Lecture, view: &LectureView, score: &QuizScore) {
    let band = score.band();
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Score: {}/{} ({}%)",
                score.correct,
                score.total,
                score.percentage()
            ),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(band.message()),
        Line::from(format!(
            "Time: {}",
            format_duration(view.quiz.elapsed_seconds())
        )),
        Line::from(""),
    ];

    let mut cursor_line = 0;
    for outcome in &score.outcomes {
        let Some(question) = lecture.quiz.get(outcome.index) else {
            continue;
        };
        if outcome.index == view.question_cursor {
            cursor_line = lines.len();
        }
        let (mark, color) = if outcome.is_correct {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", mark), Style::default().fg(color)),
            Span::from(format!("{}. {}", outcome.index + 1, question.question)),
        ]));

        let option_text = |key: &str| {
            question
                .option(key)
                .map(|o| format!("{}) {}", o.key, o.text))
                .unwrap_or_else(|| key.to_string())
        };
        let chosen = outcome
            .chosen
            .as_deref()
            .map(option_text)
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(format!("    Your answer: {}", chosen)));
        if !outcome.is_correct {
            lines.push(Line::from(Span::styled(
                format!("    Correct: {}", option_text(&outcome.correct_answer)),
                Style::default().fg(Color::Green),
            )));
        }
        lines.push(Line::from(""));
    }

    // Keep the header visible until the cursor moves past the first screen.
    let height = area.height.saturating_sub(2) as usize;
    let scroll = if cursor_line + 4 > height { cursor_line } else { 0 };

    let results = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0))
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(results, area);
}
