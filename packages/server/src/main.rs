use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quiz_server::config::AppConfig;
use quiz_server::quiz::{Feedback, RandomChooser};
use quiz_server::state::AppState;
use quiz_server::{build_router, database, seed};

/// Create the parent directory of a file-backed SQLite database.
fn prepare_sqlite_dir(url: &str) -> anyhow::Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file == ":memory:" {
        return Ok(());
    }
    if let Some(dir) = Path::new(file).parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create database directory {}", dir.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    prepare_sqlite_dir(&config.database.url)?;
    let db = database::init_db(&config.database)
        .await
        .context("failed to initialise database")?;

    if let Some(path) = &config.quiz.seed_file {
        let file = seed::load_seed_file(path).with_context(|| format!("seed file {path}"))?;
        seed::apply_seed(&db, &file)
            .await
            .context("failed to apply seed data")?;
    }

    let feedback = Feedback::new(config.quiz.feedback.clone(), Arc::new(RandomChooser));
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;

    let app = build_router(AppState::new(db, config, feedback));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Quiz server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
