use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use guichet_server::config::Config;
use guichet_server::store::Database;
use guichet_server::{create_routes, AppState};

const DEFAULT_LOG_FILTER: &str = "guichet_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().expect("Invalid configuration");

    let store = Database::connect(&config)
        .await
        .expect("Failed to open ticket store");

    let addr = config.bind_addr;
    let app = create_routes(AppState::from_config(&config, store));

    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
