use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crudapps_observability::init();

    let settings = crudapps_web::config::Settings::from_env(std::env::args().nth(1))?;
    let app = crudapps_web::app::build_app(&settings).await?;

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;

    tracing::info!(app = %settings.app, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server stopped")?;
    Ok(())
}
