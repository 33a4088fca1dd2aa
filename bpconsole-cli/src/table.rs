//! Tables for error and group listings.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

const FALLBACK_WIDTH: u16 = 120;
/// Messages are never squeezed below this many characters.
const MIN_MESSAGE_WIDTH: usize = 24;
/// Border plus padding a `UTF8_FULL` column costs.
const COLUMN_OVERHEAD: usize = 3;

/// Width of the attached terminal, or 120 columns without a TTY.
pub fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(w, _)| w)
        .unwrap_or(FALLBACK_WIDTH)
}

/// A table with `header` that wraps to `width` columns.
pub fn new_table(header: &[&str], width: u16) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(width);
    table.set_header(header.to_vec());
    table
}

/// Characters left for a trailing message column once the columns before it
/// (given by their widest cell) are laid out in `width`.
pub fn message_width(width: u16, leading_columns: &[usize]) -> usize {
    let used: usize = leading_columns
        .iter()
        .map(|column| column + COLUMN_OVERHEAD)
        .sum::<usize>()
        + COLUMN_OVERHEAD
        + 1;
    usize::from(width)
        .saturating_sub(used)
        .max(MIN_MESSAGE_WIDTH)
}

/// Shorten a validation message to `max` characters, cutting at a word
/// boundary when there is one.
pub fn shorten_message(message: &str, max: usize) -> String {
    if message.chars().count() <= max {
        return message.to_string();
    }
    let keep = max.saturating_sub(3);
    let head: String = message.chars().take(keep).collect();
    let ends_on_word = message.chars().nth(keep).is_some_and(char::is_whitespace);
    let head = match head.rfind(char::is_whitespace) {
        Some(cut) if cut > 0 && !ends_on_word => &head[..cut],
        _ => head.as_str(),
    };
    format!("{}...", head.trim_end())
}
