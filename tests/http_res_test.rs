#[cfg(test)]
mod tests {
    use http::{StatusCode, Version};
    use serde::Serialize;
    use sroute::{RouteError, http::res::Response};

    fn response() -> Response<Vec<u8>> {
        Response::new(Vec::new(), Version::HTTP_11)
    }

    #[derive(Serialize)]
    struct User {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn test_chained_status_header_send() {
        let mut res = response();
        res.status(StatusCode::CREATED)
            .set("X-Request-Id", "abc")
            .send("hello world")
            .await
            .unwrap();

        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(out.contains("x-request-id: abc\r\n"));
        assert!(out.contains("connection: close\r\n"));
        assert!(out.ends_with("\r\n\r\nhello world"));
    }

    #[tokio::test]
    async fn test_json_sets_content_type() {
        let mut res = response();
        res.json(&User { id: 1, name: "alice".into() }).await.unwrap();

        assert_eq!(res.headers().get("content-type").unwrap(), "application/json");
        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.ends_with(r#"{"id":1,"name":"alice"}"#));
    }

    #[tokio::test]
    async fn test_send_overwrites_header_before_commit() {
        let mut res = response();
        res.set("X-Mode", "a").set("x-mode", "b");
        res.send("").await.unwrap();

        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.contains("x-mode: b\r\n"));
        assert!(!out.contains("x-mode: a\r\n"));
    }

    #[tokio::test]
    async fn test_multiple_writes_in_order() {
        let mut res = response();
        res.send("a").await.unwrap().send("b").await.unwrap();
        res.json(&[1, 2]).await.unwrap();

        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.ends_with("\r\n\r\nab[1,2]"));
        // head written exactly once
        assert_eq!(out.matches("HTTP/1.1").count(), 1);
    }

    #[tokio::test]
    async fn test_status_and_header_after_commit_are_ignored() {
        let mut res = response();
        res.send("body").await.unwrap();
        res.status(StatusCode::NOT_FOUND).set("X-Late", "1");

        assert!(res.is_committed());
        assert_eq!(res.status_code(), StatusCode::OK);
        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(!out.contains("x-late"));
    }

    #[tokio::test]
    async fn test_invalid_header_is_skipped() {
        let mut res = response();
        res.set("bad header", "x").set("X-Ok", "bad\nvalue");
        assert!(res.headers().is_empty());
    }

    #[tokio::test]
    async fn test_end_blocks_further_writes() {
        let mut res = response();
        assert!(matches!(res.end(), Err(RouteError::Ended)));
        assert!(res.is_ended());
        assert!(matches!(res.send("late").await, Err(RouteError::Ended)));
    }

    #[tokio::test]
    async fn test_finish_without_body() {
        let mut res = response();
        res.status(StatusCode::NO_CONTENT);
        res.finish().await.unwrap();
        // idempotent
        res.finish().await.unwrap();

        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.starts_with("HTTP/1.1 204 No Content\r\n"));
        assert!(out.contains("content-length: 0\r\n"));
        assert!(out.ends_with("\r\n\r\n"));
        assert_eq!(out.matches("HTTP/1.1").count(), 1);
    }

    #[tokio::test]
    async fn test_http10_status_line() {
        let mut res = Response::new(Vec::new(), Version::HTTP_10);
        res.send("x").await.unwrap();
        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.starts_with("HTTP/1.0 200 OK\r\n"));
    }

    #[tokio::test]
    async fn test_status_and_header_after_end_are_ignored() {
        let mut res = response();
        res.set("X-Before", "1");
        let _ = res.end();
        res.status(StatusCode::NOT_FOUND).set("X-After-End", "1");

        assert_eq!(res.status_code(), StatusCode::OK);
        assert!(res.headers().get("x-after-end").is_none());
        assert!(res.headers().get("x-before").is_some());

        res.finish().await.unwrap();
        let out = String::from_utf8(res.into_inner()).unwrap();
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(!out.contains("x-after-end"));
    }
}
