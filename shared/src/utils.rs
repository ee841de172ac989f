/// Average reading speed used for the "N min" estimate.
pub const WORDS_PER_MINUTE: usize = 200;

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes needed to read `text`, rounded up. Empty text reads in zero minutes.
pub fn reading_minutes(text: &str) -> usize {
    word_count(text).div_ceil(WORDS_PER_MINUTE)
}

/// Keeps at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Single-line preview for list rows, with an ellipsis when shortened.
pub fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    let cut = truncate_chars(line, max_chars);
    if cut.len() < line.len() || text.trim().lines().count() > 1 {
        format!("{}…", cut.trim_end())
    } else {
        cut.to_string()
    }
}
