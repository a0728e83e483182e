//! Text helpers shared by the renderers: escaping, whitespace handling and
//! delimiter negotiation.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

/// Escape markdown special characters
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '!' | '|'
            | '<' | '>' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Escape a link or image title for use inside `"…"`
pub fn escape_title(title: &str) -> String {
    escape_markdown(title).replace('"', "\\\"")
}

/// Collapse every whitespace run (non-breaking spaces included) to one space
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() || c == '\u{a0}' {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Block-flow text keeps its line structure: only horizontal runs collapse
pub fn normalize_block_text(s: &str) -> String {
    let s = s.replace('\u{a0}', " ");
    let s = HORIZONTAL_SPACE.replace_all(&s, " ");
    collapse_blank_lines(&s)
}

/// Reduce any run of three or more newlines to exactly two
pub fn collapse_blank_lines(s: &str) -> String {
    BLANK_LINE_RUNS.replace_all(s, "\n\n").into_owned()
}

/// Length of the longest run of consecutive backticks in `s`
pub fn longest_backtick_run(s: &str) -> usize {
    s.chars()
        .fold((0, 0), |(max, current), c| {
            if c == '`' {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0
}

/// A backtick fence strictly longer than any run inside `content`, and at
/// least `min` long
pub fn backtick_fence(content: &str, min: usize) -> String {
    "`".repeat((longest_backtick_run(content) + 1).max(min))
}

/// Format a link destination so it cannot end the `(…)` early
pub fn link_destination(url: &str) -> String {
    let needs_brackets = url
        .chars()
        .any(|c| c.is_whitespace() || c == '(' || c == ')');
    if needs_brackets {
        format!("<{}>", url.replace('<', "%3C").replace('>', "%3E"))
    } else {
        url.to_string()
    }
}

/// Width of the leading run of spaces and tabs
pub fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}
