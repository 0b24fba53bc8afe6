use std::collections::HashMap;

use crate::http::segment::split_segments;

pub const PARAM_MARKER: char = ':';

/// One segment of a route pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Static(&'a str), // literal segment, must be equal
    Param(&'a str),  // `:name`, binds whatever sits at this position
}

impl<'a> Segment<'a> {
    pub fn parse(seg: &'a str) -> Self {
        if seg.starts_with(PARAM_MARKER) {
            Segment::Param(seg.trim_start_matches(PARAM_MARKER))
        } else {
            Segment::Static(seg)
        }
    }
}

pub fn parse_pattern(pattern: &str) -> Vec<Segment<'_>> {
    split_segments(pattern).into_iter().map(Segment::parse).collect()
}

/// Matches `pattern` against already segmented request path.
///
/// Returns the bound parameters on success. Segment counts must be equal,
/// there is no prefix matching. Parameter segments bind the request segment
/// verbatim, even when it is empty.
pub fn match_route<S: AsRef<str>>(pattern: &str, segments: &[S]) -> Option<HashMap<String, String>> {
    let parts = parse_pattern(pattern);

    // 1. quick count check
    if parts.len() != segments.len() {
        return None;
    }

    // 2. segment by segment
    let mut params = HashMap::new();
    for (part, seg) in parts.iter().zip(segments) {
        let seg = seg.as_ref();
        match part {
            Segment::Param(name) => {
                params.insert(name.to_string(), seg.to_string());
            }
            Segment::Static(literal) => {
                if *literal != seg {
                    return None;
                }
            }
        }
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::segment::split_segments;

    fn segs(path: &str) -> Vec<&str> {
        split_segments(path)
    }

    #[test]
    fn test_segment_parse() {
        assert_eq!(Segment::parse("users"), Segment::Static("users"));
        assert_eq!(Segment::parse(":id"), Segment::Param("id"));
        assert_eq!(Segment::parse(""), Segment::Static(""));
    }

    #[test]
    fn test_param_binding() {
        let params = match_route("/a/:x/c", &segs("/a/b/c")).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("x").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_literal_mismatch() {
        assert!(match_route("/a/:x/c", &segs("/a/b/d")).is_none());
    }

    #[test]
    fn test_count_mismatch_never_matches() {
        assert!(match_route("/users/:id", &segs("/users")).is_none());
        assert!(match_route("/users/:id", &segs("/users/1/posts")).is_none());
        assert!(match_route("/users", &segs("/users/")).is_none());
    }

    #[test]
    fn test_static_pattern_is_exact() {
        let params = match_route("/about", &segs("/about")).unwrap();
        assert!(params.is_empty());
        assert!(match_route("/about", &segs("/About")).is_none());
        assert!(match_route("/", &segs("/")).is_some());
    }

    #[test]
    fn test_empty_segment_binds_to_param() {
        let params = match_route("/users/:id", &segs("/users/")).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some(""));
    }

    #[test]
    fn test_multiple_params() {
        let params = match_route("/u/:uid/p/:pid", &segs("/u/7/p/42")).unwrap();
        assert_eq!(params["uid"], "7");
        assert_eq!(params["pid"], "42");
    }
}
