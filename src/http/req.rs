use std::{net::SocketAddr, time::Duration};

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Version, header};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt},
    time::timeout,
};

use crate::error::RequestError;

pub const MAX_CAPACITY: usize = 8 * 1024;
pub const MAX_HEADERS: usize = 100;
pub const MAX_BODY: usize = 8 * 1024 * 1024;
pub const TIME_LIMIT: u64 = 500;

/// Everything the host hands over about one inbound request.
///
/// The router never reads process-wide state; it is built from one of these.
/// Tests construct them directly with the builder methods.
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: String,
    /// Full request target, query string included.
    pub uri: String,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub peer_addr: Option<SocketAddr>,
}

impl RawRequest {
    pub fn new(method: &str, uri: &str) -> Self {
        Self {
            method: method.to_string(),
            uri: uri.to_string(),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            peer_addr: None,
        }
    }

    /// Appends a header. Invalid names or values are dropped with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => tracing::warn!(name, value, "dropping invalid request header"),
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn peer_addr(mut self, addr: SocketAddr) -> Self {
        self.peer_addr = Some(addr);
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Reads one HTTP/1.x request off the wire: request line, headers and a
    /// `Content-Length` delimited body.
    pub async fn read_from<R>(
        reader: &mut R,
        peer_addr: Option<SocketAddr>,
    ) -> Result<Self, RequestError>
    where
        R: AsyncBufRead + Unpin,
    {
        // 1. request line
        let line = read_line_with_limit(reader)
            .await
            .map_err(|e| match e {
                RequestError::HeaderTooLarge(n) => RequestError::UriTooLong(n),
                e => e,
            })?;
        let line = std::str::from_utf8(&line).map_err(|_| malformed("request line not UTF-8"))?;
        let mut parts = line.split_whitespace();

        let method = parts.next().ok_or_else(|| malformed("missing method"))?.to_string();
        let uri = parts.next().ok_or_else(|| malformed("missing path"))?.to_string();
        let version = parse_version(parts.next().ok_or_else(|| malformed("missing version"))?)?;

        // 2. headers
        let headers = parse_headers(reader).await?;

        if let Some(te) = headers.get(header::TRANSFER_ENCODING) {
            if te.to_str().unwrap_or_default().to_ascii_lowercase().contains("chunked") {
                return Err(RequestError::ChunkedNotSupported);
            }
        }

        // 3. body, read once and kept raw
        let length = match headers.get(header::CONTENT_LENGTH) {
            Some(v) => v
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .ok_or_else(|| malformed("invalid Content-Length"))?,
            None => 0,
        };
        if length > MAX_BODY {
            return Err(RequestError::BodyTooLarge(length));
        }

        let mut body = vec![0u8; length];
        if length > 0 {
            timeout(Duration::from_millis(TIME_LIMIT), reader.read_exact(&mut body))
                .await
                .map_err(|_| RequestError::Timeout)?
                .map_err(|_| malformed("body shorter than Content-Length"))?;
        }

        Ok(Self {
            method,
            uri,
            version,
            headers,
            body: Bytes::from(body),
            peer_addr,
        })
    }
}

fn malformed(msg: impl Into<String>) -> RequestError {
    RequestError::Malformed(msg.into())
}

fn parse_version(s: &str) -> Result<Version, RequestError> {
    match s.to_ascii_uppercase().as_str() {
        "HTTP/1.0" => Ok(Version::HTTP_10),
        "HTTP/1.1" => Ok(Version::HTTP_11),
        _ => Err(malformed(format!("unknown HTTP version: {}", s))),
    }
}

// Over-long lines surface as `HeaderTooLarge`; the request line caller maps
// that to `UriTooLong`.
async fn read_line_with_limit<R>(reader: &mut R) -> Result<Vec<u8>, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = timeout(
        Duration::from_millis(TIME_LIMIT),
        AsyncReadExt::take(&mut *reader, MAX_CAPACITY as u64).read_until(b'\n', &mut buf),
    )
    .await
    .map_err(|_| RequestError::Timeout)??;

    if n == 0 {
        return Err(RequestError::Closed);
    }
    if !buf.ends_with(b"\n") {
        if buf.len() >= MAX_CAPACITY {
            return Err(RequestError::HeaderTooLarge(MAX_CAPACITY));
        }
        return Err(malformed("unterminated line"));
    }
    Ok(buf)
}

async fn parse_headers<R>(reader: &mut R) -> Result<HeaderMap, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let mut map = HeaderMap::new();
    loop {
        let line_bytes = read_line_with_limit(reader).await?;
        let line = std::str::from_utf8(&line_bytes)
            .map_err(|_| malformed("header line not UTF-8"))?
            .trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if map.len() >= MAX_HEADERS {
            return Err(RequestError::TooManyHeaders(MAX_HEADERS));
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| malformed(format!("header line without colon: {}", line)))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| malformed(format!("invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| malformed(format!("invalid header value for {}", name)))?;
        map.append(name, value);
    }
    Ok(map)
}
