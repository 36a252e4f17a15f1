//! Turning user-entered pattern strings into regexes.

use crate::matchers::error::{MatcherError, MatcherResult};
use regex::{Regex, RegexBuilder};

/// Compile a pattern string.
///
/// - `/body/flags` is compiled as `body` with flags: `i` (case-insensitive),
///   `m` (multi-line), `s` (dot matches newline). `g`, `u` and `y` are
///   accepted and have no effect.
/// - Anything else is a plain pattern that must match the whole input:
///   `cpu.*` becomes `^cpu.*$`.
pub fn string_to_regex(pattern: &str) -> MatcherResult<Regex> {
    let invalid = |message: String| MatcherError::InvalidPattern {
        pattern: pattern.to_string(),
        message,
    };

    let Some((body, flags)) = split_delimited(pattern) else {
        return Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| invalid(e.to_string()));
    };

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' | 'u' | 'y' => {}
            other => return Err(invalid(format!("unsupported flag '{}'", other))),
        }
    }
    builder.build().map_err(|e| invalid(e.to_string()))
}

/// Split `/body/flags` into `(body, flags)`.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let rest = pattern.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    Some((&rest[..end], &rest[end + 1..]))
}
