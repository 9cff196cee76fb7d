use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ynab_node::client::YnabClient;
use ynab_node::config::Config;
use ynab_node::credentials::EnvCredentialStore;
use ynab_node::node::YnabNode;
use ynab_node::routes::{AppState, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ynab_node=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // The token is read from the environment on each call, not here
    let state = AppState {
        node: YnabNode::new(YnabClient::new(&config.ynab_base_url)),
        credentials: Arc::new(EnvCredentialStore::default()),
    };

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(
        "YNAB node listening on http://{} (API base {})",
        bind_address, config.ynab_base_url
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}
