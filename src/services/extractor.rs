/// Returns the span from the first `{` to the last `}` in `text`, inclusive.
///
/// The match is greedy and does not balance braces. Prose before and after a
/// single object is tolerated, but two separate objects in one reply come
/// back as one span that will not parse.
pub fn extract_json_candidate(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    Some(&text[start..=end])
}
