use std::net::SocketAddr;

use futures::FutureExt;
use sroute::http::config::RouterConfig;
use sroute::http::types::{ServerWriter, to_app};
use sroute::server::HTTPServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr: SocketAddr = "0.0.0.0:8080".parse()?;

    let app = to_app::<ServerWriter, _>(|router| {
        async move {
            router
                .get("/", |_req, res| {
                    async move { res.send("Hello world!").await?.end() }.boxed()
                })
                .await
        }
        .boxed()
    });

    HTTPServer::new(addr, RouterConfig::default(), app).start().await
}
