//! Feedback form web server
//!
//! (c) Softlandia 2026

use feedback_form::api;
use feedback_form::config::AppConfig;
use feedback_form::infrastructure::repositories::{open_repository, prepare_schema};
use feedback_form::infrastructure::traits::MessageRepository;

use anyhow::{Context, anyhow};
use di::Ref;
use log::info;
use tokio::runtime::{Builder, Runtime};

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(web_server_task(config))
}

async fn web_server_task(config: AppConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(config.upload_dir())
        .await
        .with_context(|| format!("cannot create {}", config.upload_dir().display()))?;

    let repository: Ref<dyn MessageRepository> = open_repository(&config)?;

    prepare_schema(repository.as_ref()).await;

    let config = Ref::new(config);
    let app = api::app(config.clone(), repository)
        .map_err(|e| anyhow!("invalid service registrations: {e:?}"))?;

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("listening on {}", listener.local_addr()?);
    info!("messages are listed at {}", config.admin_path);
    axum::serve(listener, app).await?;
    info!("Shutting down...");

    Ok(())
}
