use std::net::SocketAddr;

use anyhow::Context as _;
use tokio::net::TcpListener;
use vanguard_server::AppState;

use crate::source::{self, EngineArg, SourceArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ServeArg {
    /// Address to listen on
    #[arg(long, env = "VANGUARD_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
    #[clap(flatten)]
    source: SourceArg,
    #[clap(flatten)]
    engine: EngineArg,
}

pub(crate) fn run(arg: &ServeArg) -> anyhow::Result<()> {
    let ServeArg {
        bind,
        source,
        engine,
    } = arg;
    let engine = source::build_engine(source, engine)?;
    let state = AppState::new(engine);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(async {
        let listener = TcpListener::bind(*bind)
            .await
            .with_context(|| format!("Failed to bind {bind}"))?;
        vanguard_server::serve(listener, state)
            .await
            .context("Server terminated unexpectedly")
    })
}
