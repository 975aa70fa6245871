use dashboard_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("Dashboard server starting...");

    // Startup misconfiguration is fatal: exit so a supervisor restarts us
    // cleanly instead of serving with a broken store dependency.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let state = match ServerState::initialize(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize server state: {e}");
            std::process::exit(1);
        }
    };

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
