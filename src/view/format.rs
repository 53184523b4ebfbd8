//! Plain-text rendering of conversation rows

use chrono::{DateTime, Datelike, Local};

use crate::conversation::ConversationRecord;

/// Characters of the last message shown in a row
const PREVIEW_CHARS: usize = 60;

/// Short relative date: time today, weekday within a week, otherwise a date.
/// Unknown timestamps (0) render as "-".
pub fn format_time(timestamp: i64) -> String {
    if timestamp <= 0 {
        return "-".to_string();
    }
    let Some(dt) = DateTime::from_timestamp(timestamp, 0) else {
        return "-".to_string();
    };
    let dt = dt.with_timezone(&Local);

    let today = Local::now().date_naive();
    let date = dt.date_naive();

    if date == today {
        dt.format("%H:%M").to_string()
    } else if (today - date).num_days() < 7 {
        dt.format("%a %H:%M").to_string()
    } else if date.year() == today.year() {
        dt.format("%b %d").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Single-line preview: control characters dropped, truncated with an ellipsis.
pub fn preview(text: &str) -> String {
    let clean: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    let clean = clean.trim();
    if clean.chars().count() <= PREVIEW_CHARS {
        return clean.to_string();
    }
    let mut cut: String = clean.chars().take(PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}

pub fn format_row(record: &ConversationRecord) -> String {
    let unread = match record.unread_count {
        0 => String::new(),
        n => format!("({})", n),
    };
    format!(
        "{:>10}  {:<24} {:>5}  {}",
        format_time(record.last_message_at),
        record.display_name(),
        unread,
        preview(&record.last_message_text)
    )
}
