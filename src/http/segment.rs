/// Splits a path or route pattern on `/`.
///
/// Splitting is literal: a leading slash yields a leading empty segment and
/// an empty string yields a single empty segment. Patterns and request paths
/// go through the same function so their segment counts line up.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

pub fn to_owned_segments(path: &str) -> Vec<String> {
    split_segments(path).into_iter().map(str::to_string).collect()
}
