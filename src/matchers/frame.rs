//! Frame matchers: select whole frames by query ref id or position.

use crate::matchers::{
    frame_matcher_id as id, parse_options, string_to_regex, FrameMatcher, FrameMatcherInfo,
    MatcherResult,
};

/// Match frames by ref id.
///
/// `/…/` patterns are compiled as regexes; anything else must equal the
/// ref id exactly. Frames without a ref id never match.
pub fn ref_id_matcher(pattern: &str) -> MatcherResult<FrameMatcher> {
    if pattern.starts_with('/') && pattern.len() > 1 && pattern[1..].contains('/') {
        let regex = string_to_regex(pattern)?;
        return Ok(FrameMatcher::new(move |frame, _| {
            frame.ref_id.as_deref().map_or(false, |r| regex.is_match(r))
        }));
    }
    let expected = pattern.to_string();
    Ok(FrameMatcher::new(move |frame, _| {
        frame.ref_id.as_deref() == Some(expected.as_str())
    }))
}

pub(crate) fn matchers() -> Vec<FrameMatcherInfo> {
    vec![
        FrameMatcherInfo::new(id::BY_REF_ID, "Query refId", |options, _| {
            let pattern: String = parse_options(id::BY_REF_ID, options)?;
            ref_id_matcher(&pattern)
        })
        .with_description("Match frames by the query that produced them")
        .with_display_text(|options| format!("RefID: {}", options.as_str().unwrap_or_default())),
        FrameMatcherInfo::new(id::BY_INDEX, "Frame index", |options, _| {
            let target: usize = parse_options(id::BY_INDEX, options)?;
            Ok(FrameMatcher::new(move |_, index| index == target))
        })
        .with_description("Match the frame at a position")
        .with_default_options(serde_json::json!(0))
        .with_display_text(|options| format!("Frame {}", options))
        .hidden(),
    ]
}
