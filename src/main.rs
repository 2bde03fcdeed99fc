mod api_doc;
mod app;
mod config;
mod error;
mod extract;
mod handlers;
mod models;
mod routes;
mod schema;
mod state;
mod store;

use config::Config;
use state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("gentle-giant-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = store::connect(&config).await;
    let addr = format!("{}:{}", config.service_host, config.service_port);
    let app = app::router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("API docs available at http://{}{}", addr, routes::DOCS);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("gentle-giant-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Could not install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
    tracing::info!("Shutdown signal received");
}
