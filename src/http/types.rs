use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::{io::BufWriter, net::tcp::OwnedWriteHalf};

use crate::{error::RouteResult, http::router::Router};

/// Writer used by routers the bundled server builds.
pub type ServerWriter = BufWriter<OwnedWriteHalf>;

/// Per-request application: receives the freshly built router and issues its
/// registrations in order.
pub type App<W = ServerWriter> =
    dyn for<'a> Fn(&'a mut Router<W>) -> BoxFuture<'a, RouteResult<()>> + Send + Sync;

pub fn to_app<W, F>(f: F) -> Arc<App<W>>
where
    F: for<'a> Fn(&'a mut Router<W>) -> BoxFuture<'a, RouteResult<()>> + Send + Sync + 'static,
{
    Arc::new(f)
}
