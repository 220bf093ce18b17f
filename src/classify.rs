//! Line classification and canonical rewriting for TP program bodies.
//!
//! Every body line falls into exactly one [`LineKind`]. The kinds are tried
//! in the fixed order of [`RULES`]; the first rule whose pattern matches wins
//! and its rewrite produces the canonical text of the line.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Classification of one body line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    Blank,
    /// Starts with a bare `:`; extends the previous statement
    Continuation,
    /// Ends in `; ;`
    DoubleTerminated,
    /// Content wrapped in two terminators, `;content;`
    BetweenMarkers,
    /// A number prefix and nothing else
    NumberedNoTerminator,
    /// A number prefix and content without any terminator
    NumberedWordNoTerminator,
    /// Only a terminator, with or without a number prefix
    TerminatorOnly,
    AlreadyNumbered,
    /// Un-numbered `J`/`L` motion statement
    MotionStatement,
    Unclassified,
}

struct Patterns {
    blank: Regex,
    continuation: Regex,
    double_terminated: Regex,
    between_markers: Regex,
    numbered_no_terminator: Regex,
    numbered_word_no_terminator: Regex,
    terminator_only: Regex,
    already_numbered: Regex,
    motion: Regex,
    open_continuation: Regex,
    close_continuation: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("valid line pattern");
        Patterns {
            blank: re(r"^\s*$"),
            continuation: re(r"^\s*:"),
            double_terminated: re(r"\s*;\s*;\s*$"),
            between_markers: re(r"^\s*(\d{1,4}:|\s*)\s*;([^;]*);$"),
            numbered_no_terminator: re(r"^\s*(\d{1,4}):\s*$"),
            numbered_word_no_terminator: re(r"^\s*(\d{1,4}):\s*[^;]*$"),
            terminator_only: re(r"^\s*(\d{1,4}:)?\s*;$"),
            already_numbered: re(r"^\s*\d+:"),
            motion: re(r"(^\s*(\d{1,4}):|\s+)\s*[JL]\s"),
            open_continuation: re(r"\s*;+\s*$"),
            close_continuation: re(r"(\s*; ;\s*\s*$|\s*;*\s*$)"),
        }
    })
}

/// One entry of the classification table
pub struct Rule {
    pub kind: LineKind,
    matches: fn(&str) -> bool,
    rewrite: fn(&str, &str) -> String,
}

impl Rule {
    pub fn matches(&self, line: &str) -> bool {
        (self.matches)(line)
    }

    /// Canonical text of `line` under the number field `number`
    pub fn rewrite(&self, line: &str, number: &str) -> String {
        (self.rewrite)(line, number)
    }
}

/// Classification rules in precedence order
pub static RULES: [Rule; 9] = [
    Rule { kind: LineKind::Blank, matches: is_blank, rewrite: blank_form },
    Rule { kind: LineKind::Continuation, matches: is_continuation, rewrite: keep_line },
    Rule { kind: LineKind::DoubleTerminated, matches: is_double_terminated, rewrite: collapse_double },
    Rule { kind: LineKind::BetweenMarkers, matches: is_between_markers, rewrite: unwrap_between },
    Rule {
        kind: LineKind::NumberedNoTerminator,
        matches: is_numbered_no_terminator,
        rewrite: terminate_empty,
    },
    Rule {
        kind: LineKind::NumberedWordNoTerminator,
        matches: is_numbered_word_no_terminator,
        rewrite: terminate_word,
    },
    Rule { kind: LineKind::TerminatorOnly, matches: is_terminator_only, rewrite: blank_form },
    Rule { kind: LineKind::AlreadyNumbered, matches: is_already_numbered, rewrite: renumber_prefix },
    Rule { kind: LineKind::MotionStatement, matches: is_motion, rewrite: number_motion },
];

/// Classify a body line
pub fn classify(line: &str) -> LineKind {
    RULES
        .iter()
        .find(|rule| rule.matches(line))
        .map_or(LineKind::Unclassified, |rule| rule.kind)
}

/// Classify `line` and produce its canonical text
///
/// Continuation lines come back unchanged.
pub fn canonicalize(line: &str, number: &str) -> (LineKind, String) {
    match RULES.iter().find(|rule| rule.matches(line)) {
        Some(rule) => (rule.kind, rule.rewrite(line, number)),
        None => (LineKind::Unclassified, format!("{}:  {}", number, line.trim_start())),
    }
}

/// Normalize the line before a continuation run to a single trailing terminator
pub fn open_continuation(line: &str) -> String {
    patterns().open_continuation.replace(line, " ;").into_owned()
}

/// Terminate the last line of a continuation run with a single terminator
pub fn close_continuation(line: &str) -> String {
    patterns().close_continuation.replace(line, " ;").into_owned()
}

fn is_blank(line: &str) -> bool {
    patterns().blank.is_match(line)
}

fn is_continuation(line: &str) -> bool {
    patterns().continuation.is_match(line)
}

fn is_double_terminated(line: &str) -> bool {
    patterns().double_terminated.is_match(line)
}

fn is_between_markers(line: &str) -> bool {
    patterns().between_markers.is_match(line)
}

fn is_numbered_no_terminator(line: &str) -> bool {
    patterns().numbered_no_terminator.is_match(line)
}

fn is_numbered_word_no_terminator(line: &str) -> bool {
    patterns().numbered_word_no_terminator.is_match(line)
}

fn is_terminator_only(line: &str) -> bool {
    patterns().terminator_only.is_match(line)
}

fn is_already_numbered(line: &str) -> bool {
    patterns().already_numbered.is_match(line)
}

fn is_motion(line: &str) -> bool {
    patterns().motion.is_match(line)
}

/// Text after an existing `NNNN:` prefix, or `None` if the line has none
fn after_number(line: &str) -> Option<&str> {
    patterns().already_numbered.find(line).map(|m| &line[m.end()..])
}

fn blank_form(_line: &str, number: &str) -> String {
    format!("{}:   ;", number)
}

fn keep_line(line: &str, _number: &str) -> String {
    line.to_string()
}

fn collapse_double(line: &str, number: &str) -> String {
    let body = match after_number(line) {
        Some(rest) => rest.to_string(),
        None => format!("  {}", line.trim_start()),
    };
    let collapsed = format!(
        "{}:{}",
        number,
        patterns().double_terminated.replace(&body, " ;")
    );
    if patterns().terminator_only.is_match(&collapsed) {
        blank_form(line, number)
    } else {
        collapsed
    }
}

fn unwrap_between(line: &str, number: &str) -> String {
    let content = patterns()
        .between_markers
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map_or("", |m| m.as_str().trim());

    if content.starts_with("J ") || content.starts_with("L ") {
        format!("{}:{} ;", number, content)
    } else {
        format!("{}:  {} ;", number, content)
    }
}

fn terminate_empty(line: &str, number: &str) -> String {
    let rest = after_number(line).unwrap_or(line);
    format!("{}:{}   ;", number, rest.trim_end())
}

fn terminate_word(line: &str, number: &str) -> String {
    let rest = after_number(line).unwrap_or(line);
    format!("{}:{} ;", number, rest.trim_end())
}

fn renumber_prefix(line: &str, number: &str) -> String {
    let rest = after_number(line).unwrap_or(line);
    format!("{}:{}", number, rest)
}

fn number_motion(line: &str, number: &str) -> String {
    format!("{}:{}", number, line.trim_start())
}
