use std::collections::HashMap;

/// Splits a url into its path and the raw query string after the first `?`.
pub fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((path, qs)) => (path, Some(qs)),
        None => (url, None),
    }
}

/// Parses `a=1&b=2` style pairs. Percent escapes and `+` are decoded,
/// a repeated key keeps its last value.
pub fn parse_pairs(pairs: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (k, v) in form_urlencoded::parse(pairs.as_bytes()) {
        map.insert(k.into_owned(), v.into_owned());
    }
    map
}

pub fn parse_query(url: &str) -> HashMap<String, String> {
    split_query(url).1.map(parse_pairs).unwrap_or_default()
}

/// Parses an `application/x-www-form-urlencoded` body.
pub fn parse_form(body: &[u8]) -> HashMap<String, String> {
    form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("/search?q=cats"), ("/search", Some("q=cats")));
        assert_eq!(split_query("/search"), ("/search", None));
        assert_eq!(split_query("/a?b?c"), ("/a", Some("b?c")));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let q = parse_pairs("tag=a&tag=b");
        assert_eq!(q.get("tag").map(String::as_str), Some("b"));
    }
}
