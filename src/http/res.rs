use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version, header};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{RouteError, RouteResult};

/// Chainable writer over the live outbound response.
///
/// Nothing is buffered here: the status line and headers go out on the first
/// body write (or at [`finish`](Self::finish)), and every body write is
/// flushed before it returns. Status and header changes made after the head
/// is out are ignored.
pub struct Response<W> {
    writer: W,
    version: Version,
    status: StatusCode,
    headers: HeaderMap,
    committed: bool,
    ended: bool,
}

impl<W> Response<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W, version: Version) -> Self {
        Self {
            writer,
            version,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            committed: false,
            ended: false,
        }
    }

    pub fn status(&mut self, code: StatusCode) -> &mut Self {
        if self.ended {
            tracing::warn!(status = code.as_u16(), "status ignored, response ended");
        } else if self.committed {
            tracing::warn!(status = code.as_u16(), "status ignored, head already sent");
        } else {
            self.status = code;
        }
        self
    }

    /// Sets a response header, replacing any previous value.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        if self.ended {
            tracing::warn!(name, "header ignored, response ended");
            return self;
        }
        if self.committed {
            tracing::warn!(name, "header ignored, head already sent");
            return self;
        }
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(name, value, "invalid response header ignored"),
        }
        self
    }

    /// Serializes `data`, marks the response as JSON and writes it out.
    pub async fn json<T: Serialize + ?Sized>(&mut self, data: &T) -> RouteResult<&mut Self> {
        let body = serde_json::to_vec(data)?;
        self.set(header::CONTENT_TYPE.as_str(), "application/json");
        self.send(body).await
    }

    /// Writes `data` verbatim as (more) body.
    pub async fn send<D: AsRef<[u8]>>(&mut self, data: D) -> RouteResult<&mut Self> {
        if self.ended {
            return Err(RouteError::Ended);
        }
        self.write_head(false).await?;
        self.writer.write_all(data.as_ref()).await?;
        self.writer.flush().await?;
        Ok(self)
    }

    /// Stops the request. Always returns `Err(RouteError::Ended)` so handlers
    /// leave with `res.end()?` or `return res.end()`.
    pub fn end(&mut self) -> RouteResult<()> {
        self.ended = true;
        Err(RouteError::Ended)
    }

    /// Sends the head if no body was ever written and flushes the writer.
    pub async fn finish(&mut self) -> RouteResult<()> {
        self.write_head(true).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn write_head(&mut self, empty: bool) -> RouteResult<()> {
        if self.committed {
            return Ok(());
        }
        if empty && !self.headers.contains_key(header::CONTENT_LENGTH) {
            self.headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        }
        if !self.headers.contains_key(header::CONNECTION) {
            self.headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        }

        let mut head = format!(
            "{:?} {} {}\r\n",
            self.version,
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        )
        .into_bytes();
        for (k, v) in &self.headers {
            head.extend_from_slice(k.as_str().as_bytes());
            head.extend_from_slice(b": ");
            head.extend_from_slice(v.as_bytes());
            head.extend_from_slice(b"\r\n");
        }
        head.extend_from_slice(b"\r\n");

        self.committed = true;
        self.writer.write_all(&head).await?;
        Ok(())
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub(crate) fn mark_ended(&mut self) {
        self.ended = true;
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
