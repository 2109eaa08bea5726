/**
 * Wizzchat Server Entry Point
 *
 * This is the main entry point for the wizzchat backend server.
 * It initializes the Axum HTTP server with the realtime channel.
 */

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    // Initialize tracing
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!("Server initialization started");

    // Create the Axum app
    let app = wizzchat::backend::server::init::create_app().await;

    let port = wizzchat::backend::server::config::server_port();
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
