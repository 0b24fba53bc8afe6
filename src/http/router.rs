use std::collections::HashSet;

use futures::future::BoxFuture;
use http::StatusCode;
use serde_json::json;
use tokio::io::AsyncWrite;

use crate::{
    error::{RouteError, RouteResult},
    http::{
        config::RouterConfig, context::Request, matcher::match_route, meta::RequestMeta,
        req::RawRequest, res::Response,
    },
};

/// Per-request router.
///
/// There is no route table. Each registration call checks the method, runs
/// the matcher against the segments captured at construction and, on the
/// first match, runs the handler before returning. Later registrations are
/// still evaluated but never dispatch a second handler. After
/// [`Response::end`] every registration returns `Err(RouteError::Ended)`
/// without looking at the request. A failing handler is logged and answered
/// with `500`; the caller only sees the request as ended.
pub struct Router<W> {
    meta: RequestMeta,
    raw: RawRequest,
    allowed_methods: HashSet<String>,
    res: Response<W>,
    dispatched: bool,
}

macro_rules! method_handlers {
    ($($name:ident => $method:expr),* $(,)?) => {
        $(
            #[doc = concat!("Registers `handler` for `", $method, "` requests matching `pattern`.")]
            pub async fn $name<F>(&mut self, pattern: &str, handler: F) -> RouteResult<()>
            where
                F: for<'a> FnOnce(&'a Request, &'a mut Response<W>) -> BoxFuture<'a, RouteResult<()>>
                    + Send,
            {
                self.handle($method, pattern, handler).await
            }
        )*
    };
}

impl<W> Router<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Captures the request state. With a custom method set, a request whose
    /// method is outside it is answered with `405` right here and the router
    /// comes back already ended.
    pub async fn new(raw: RawRequest, writer: W, config: &RouterConfig) -> RouteResult<Self> {
        let meta = RequestMeta::new(&raw.uri, &raw.method, &config.base_path);
        let res = Response::new(writer, raw.version);

        let mut router = Self {
            meta,
            raw,
            allowed_methods: config.method_set(),
            res,
            dispatched: false,
        };

        if config.is_gated() && !router.allowed_methods.contains(&router.meta.method) {
            tracing::debug!(method = %router.meta.method, "method not allowed");
            router
                .res
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .json(&json!({ "error": 405, "msg": "method not allowed" }))
                .await?;
            router.res.mark_ended();
        }

        Ok(router)
    }

    method_handlers! {
        get => "get",
        post => "post",
        put => "put",
        patch => "patch",
        delete => "delete",
    }

    /// Registration for any method name, compared case-insensitively.
    pub async fn handle<F>(&mut self, method: &str, pattern: &str, handler: F) -> RouteResult<()>
    where
        F: for<'a> FnOnce(&'a Request, &'a mut Response<W>) -> BoxFuture<'a, RouteResult<()>>
            + Send,
    {
        if self.res.is_ended() {
            return Err(RouteError::Ended);
        }
        if !self.meta.method.eq_ignore_ascii_case(method) {
            return Ok(());
        }

        let Some(params) = match_route(pattern, &self.meta.segments) else {
            tracing::trace!(pattern, path = %self.meta.path, "no match");
            return Ok(());
        };

        if self.dispatched {
            tracing::debug!(pattern, path = %self.meta.path, "match shadowed by an earlier route");
            return Ok(());
        }
        self.dispatched = true;
        tracing::debug!(method, pattern, path = %self.meta.path, "route matched");

        let req = Request::build(&self.meta, &self.raw, params);
        match handler(&req, &mut self.res).await {
            Ok(()) => Ok(()),
            Err(RouteError::Ended) => {
                self.res.mark_ended();
                Err(RouteError::Ended)
            }
            Err(err) => {
                self.fail(&err).await;
                Err(RouteError::Ended)
            }
        }
    }

    async fn fail(&mut self, err: &RouteError) {
        tracing::error!(error = %err, path = %self.meta.path, "handler failed");
        if !self.res.is_committed() && !self.res.is_ended() {
            let written = self
                .res
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .json(&json!({ "error": 500, "msg": "internal server error" }))
                .await;
            if let Err(e) = written {
                tracing::error!(error = %e, "failed to write error response");
            }
        }
        self.res.mark_ended();
    }

    /// Completes the response. A request nothing matched goes out with the
    /// default `200` and an empty body.
    pub async fn finish(&mut self) -> RouteResult<()> {
        if !self.dispatched && !self.res.is_ended() {
            tracing::debug!(method = %self.meta.method, path = %self.meta.path, "no route matched");
        }
        self.res.finish().await
    }

    pub fn is_ended(&self) -> bool {
        self.res.is_ended()
    }

    /// Whether a handler has been dispatched for this request.
    pub fn matched(&self) -> bool {
        self.dispatched
    }

    pub fn meta(&self) -> &RequestMeta {
        &self.meta
    }

    pub fn method(&self) -> &str {
        &self.meta.method
    }

    pub fn path(&self) -> &str {
        &self.meta.path
    }

    pub fn allowed_methods(&self) -> &HashSet<String> {
        &self.allowed_methods
    }

    pub fn response(&self) -> &Response<W> {
        &self.res
    }

    pub fn into_inner(self) -> W {
        self.res.into_inner()
    }
}
