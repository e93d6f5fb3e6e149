//! Title slicing and normalization.

/// Characters trimmed from the end of a title span.
const TRAILING: &[char] = &[' ', '.', '_', '-', '(', '['];

/// Characters trimmed from the start of a title span.
const LEADING: &[char] = &[' ', '.', '_', '-', ')', ']'];

/// Slice `input[start..end]` and normalize it into a title.
///
/// Returns `None` when the span is empty or holds nothing but separators.
pub(crate) fn extract(input: &str, start: usize, end: usize, title_case: bool) -> Option<String> {
    let raw = input.get(start..end)?;
    let raw = raw.trim_start_matches(LEADING).trim_end_matches(TRAILING);
    let title = normalize(raw, title_case);
    (!title.is_empty()).then_some(title)
}

/// Normalize raw release text into a display title.
///
/// Dots and underscores become spaces, runs of whitespace collapse, leading
/// and trailing `-`, `_` and spaces are trimmed. With `title_case` the first
/// letter of every word is upper-cased; other letters are left as they are.
///
/// ```
/// # use kourai_parser::normalize_title;
/// assert_eq!(normalize_title("clobberin.time", true), "Clobberin Time");
/// assert_eq!(normalize_title("the_ABC_murders", false), "the ABC murders");
/// ```
pub fn normalize(raw: &str, title_case: bool) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c| c == '-' || c == '_' || c == ' ');

    if title_case {
        to_title_case(trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Upper-case letters that start a word; never lower-cases anything.
///
/// An apostrophe does not start a new word, so `clobberin'` stays intact and
/// `don't` does not become `Don'T`.
fn to_title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '\'');
    }
    out
}
