//! Lacuna Visualization Server
//!
//! Build a session for the configured seed and serve it over HTTP.

use lacuna_vis::{spawn_session, Seed, Session, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lacuna_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = VisConfig::from_env()?;
    if let Some(port) = std::env::args().nth(1) {
        config.addr.set_port(port.parse()?);
    }

    let seed = match Seed::new(config.seed.clone()) {
        Ok(seed) => seed,
        Err(e) => {
            tracing::warn!("{}; using the default seed", e);
            Seed::default()
        }
    };

    let (session, _task) = spawn_session(Session::new(seed));
    let status = session.status().await?;
    tracing::info!(
        total_steps = status.total_steps,
        "Missing-numbers walkthrough ready"
    );

    VisServer::new(session).serve(config.addr).await?;

    Ok(())
}
