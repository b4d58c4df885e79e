use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ai_checker::{ai::AiClient, config::Config, db, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ai_checker=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load();

  let pool = db::init_db(&config.database_path).expect("Failed to initialize database");
  let ai = AiClient::from_config(&config.ai);

  let bind_addr = config.bind_addr();
  let port = config.port;
  let app = handlers::router(AppState::new(pool, ai, config));

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
