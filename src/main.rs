use anyhow::Result;
use sheetsync::{pipeline, Config};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("🚀 starting sheet sync");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::from_env().map_err(|e| {
        error!("❌ {}", e);
        e
    })?;
    info!(host = %config.host, policy = ?config.settings_policy, "configured");

    // ─── 3) fetch → index → upload → settings ────────────────────────
    match pipeline::run(&config).await {
        Ok(report) => {
            info!(records = report.records, "🎉 all done");
            Ok(())
        }
        Err(e) => {
            error!("❌ {}", e);
            Err(e.into())
        }
    }
}
