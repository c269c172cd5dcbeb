pub mod markdown;

pub use markdown::{parse_inline, render_notes};

use chrono::{DateTime, Local, Utc};
use unicode_width::UnicodeWidthChar;

const DATE_FORMAT_TODAY: &str = "Today %H:%M";
const DATE_FORMAT_YESTERDAY: &str = "Yesterday %H:%M";
const DATE_FORMAT_OTHER: &str = "%Y-%m-%d";

/// Cut `s` to at most `max_width` terminal columns, ending in "..." when shortened.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }

    let room = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

/// Running quiz timer, `m:ss`.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Time taken on the results screen, `Xm YYs`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}m {:02}s", seconds / 60, seconds % 60)
}

pub fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(timestamp) = timestamp else {
        return "-".to_string();
    };
    let datetime: DateTime<Local> = timestamp.into();
    let today = Local::now().date_naive();
    let date = datetime.date_naive();

    if date == today {
        datetime.format(DATE_FORMAT_TODAY).to_string()
    } else if date == today - chrono::Duration::days(1) {
        datetime.format(DATE_FORMAT_YESTERDAY).to_string()
    } else {
        datetime.format(DATE_FORMAT_OTHER).to_string()
    }
}

/// "●○○" style progress dots, capped so long decks still fit on one line.
pub fn progress_dots(current: usize, total: usize, max_dots: usize) -> String {
    if total == 0 || max_dots == 0 {
        return String::new();
    }
    if total > max_dots {
        return format!("{} / {}", current + 1, total);
    }
    (0..total)
        .map(|i| if i == current { '●' } else { '○' })
        .collect()
}
