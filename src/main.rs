use std::net::SocketAddr;

use clap::Parser;
use futures::FutureExt;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use sroute::{
    http::{config::RouterConfig, types::{ServerWriter, to_app}},
    server::HTTPServer,
};

#[derive(Parser, Debug)]
#[command(name = "sroute")]
struct Opt {
    #[arg(long, default_value = "0.0.0.0")]
    ip: String,

    #[arg(long, default_value_t = 9000)]
    port: u16,

    /// Prefix stripped before matching, e.g. `/api`.
    #[arg(long, default_value = "")]
    base_path: String,

    /// Restrict accepted methods (repeatable). Anything else gets 405.
    #[arg(long = "allow")]
    allow: Vec<String>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opt = Opt::parse();
    let addr: SocketAddr = format!("{}:{}", opt.ip, opt.port).parse()?;

    let mut config = RouterConfig::new().with_base_path(opt.base_path);
    if !opt.allow.is_empty() {
        config = config.with_allowed_methods(opt.allow);
    }

    let app = to_app::<ServerWriter, _>(|router| {
        async move {
            router
                .get("/", |_req, res| {
                    async move {
                        res.send("Hello world!").await?;
                        Ok(())
                    }
                    .boxed()
                })
                .await?;

            router
                .get("/users/:id", |req, res| {
                    async move {
                        res.json(&json!({
                            "id": req.param("id"),
                            "query": req.queries(),
                            "ip": req.ip(),
                        }))
                        .await?
                        .end()
                    }
                    .boxed()
                })
                .await?;

            router
                .post("/echo", |req, res| {
                    async move {
                        res.set("X-Echo", "1").send(req.body().clone()).await?;
                        Ok(())
                    }
                    .boxed()
                })
                .await?;

            Ok(())
        }
        .boxed()
    });

    HTTPServer::new(addr, config, app).start().await
}
