use anyhow::Context;
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use traffic_dispatch::api::{create_routes, AppState};
use traffic_dispatch::config::{DEFAULT_SLOWDOWN_RATE, DEFAULT_SLOWDOWN_ZONE};
use traffic_dispatch::strategy::registered_names;
use traffic_dispatch::SlowdownConfig;

#[derive(Parser)]
#[command(name = "traffic-dispatch")]
#[command(about = "Junction arbitration and motion control for externally simulated cars")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "DISPATCH_LISTEN", default_value = "127.0.0.1:8000")]
    listen: SocketAddr,

    /// Default slowdown zone length in m, used when a setup gives none
    #[arg(long, env = "DISPATCH_SLOWDOWN_ZONE", default_value_t = DEFAULT_SLOWDOWN_ZONE)]
    slowdown_zone: f64,

    /// Default slowdown rate, used when a setup gives none
    #[arg(long, env = "DISPATCH_SLOWDOWN_RATE", default_value_t = DEFAULT_SLOWDOWN_RATE)]
    slowdown_rate: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let defaults = SlowdownConfig::new(cli.slowdown_zone, cli.slowdown_rate)
        .context("invalid default slowdown parameters")?;

    let app = create_routes(AppState::new(defaults));
    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;

    info!(
        "Listening on {} (zone {} m, rate {}, strategies: {})",
        cli.listen,
        defaults.zone,
        defaults.rate,
        registered_names().join(", ")
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
