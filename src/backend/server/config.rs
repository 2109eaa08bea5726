/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration,
 * focusing on the optional PostgreSQL database connection.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables, with sensible
 * defaults for local development when possible.
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup.
 * Services that fail to initialize are set to `None` and the server
 * continues without them.
 */

use sqlx::PgPool;

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<PgPool>;

/// Load and initialize database connection pool
///
/// This function:
/// 1. Reads `DATABASE_URL` from environment
/// 2. Creates a PostgreSQL connection pool
/// 3. Runs database migrations
///
/// # Returns
///
/// - `Some(PgPool)` if database is successfully configured
/// - `None` if `DATABASE_URL` is not set or connection fails
///
/// # Errors
///
/// Errors are logged but do not prevent server startup. The function
/// returns `None` on any error, allowing the server to run without
/// database features (REST chat and the channel both refuse requests
/// in that mode, but the process stays up).
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    // Run migrations
    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {:?}", e);
            // Continue anyway - migrations might have already been run
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Listen port for the HTTP server, from `SERVER_PORT`
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3001)
}

/// Origin allowed to call this server, from `FRONTEND_URL`
pub fn frontend_origin() -> String {
    std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        // Only meaningful when SERVER_PORT is unset in the test env
        if std::env::var("SERVER_PORT").is_err() {
            assert_eq!(server_port(), 3001);
        }
    }

    #[test]
    fn test_default_frontend_origin() {
        if std::env::var("FRONTEND_URL").is_err() {
            assert_eq!(frontend_origin(), "http://localhost:3000");
        }
    }
}
