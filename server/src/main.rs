use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use agenda_server::config::Config;
use agenda_server::routes::create_routes;
use agenda_server::state::AppState;
use agenda_server::store;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("agenda_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let store = store::connect(&config)
        .await
        .expect("Failed to initialise event store");
    let app = create_routes(AppState::new(store), &config);

    tracing::info!("Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
