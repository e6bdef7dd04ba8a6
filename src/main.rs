use recipes_api::{app, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("recipes_api=debug,axum=info,tower_http=info");

    let app_state = AppState::init().await?;
    let config = app_state.config.clone();

    let app = app::build_app(app_state)?;
    app::serve(app, &config).await
}
