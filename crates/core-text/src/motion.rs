//! Column helpers for word motions.
//!
//! These operate on a single row's text and know nothing about the cursor or
//! neighbouring rows; stepping across rows is the cursor's job. A "word
//! boundary" here is simply a space character.

/// Column after the next space at or after `column`, or the row end when
/// there is none.
pub fn next_word_column(row: &str, column: usize) -> usize {
    row.chars()
        .skip(column)
        .position(|c| c == ' ')
        .map_or_else(|| row.chars().count(), |p| column + p + 1)
}

/// Column after the last space strictly before `column - 1`, or 0 when there
/// is none. Skipping the unit just before the cursor lets repeated presses
/// walk back word by word instead of sticking at a word start.
pub fn prev_word_column(row: &str, column: usize) -> usize {
    let limit = column.saturating_sub(1);
    row.chars()
        .take(limit)
        .enumerate()
        .filter(|(_, c)| *c == ' ')
        .last()
        .map_or(0, |(i, _)| i + 1)
}

/// Markdown heading level of a row: the number (1..=6) of leading `#`
/// characters followed by a space or the end of the row.
pub fn heading_level(row: &str) -> Option<u8> {
    let hashes = row.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match row.chars().nth(hashes) {
        None | Some(' ') => Some(hashes as u8),
        Some(_) => None,
    }
}
