//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use crate::session::SessionSettings;
use clap::Parser;
use tracing::{error, info, warn};

/// Secret used when none is configured. Only suitable for local development.
const DEV_JWT_SECRET: &str = "your_jwt_secret";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bookreview",
    about = "Book review API with JWT authentication"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "4000")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "bookreview.db")]
    pub database: String,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Access token lifetime in hours
    #[arg(long, env = "TOKEN_EXPIRATION", default_value = "24",
        value_parser = clap::value_parser!(u64).range(1..))]
    pub token_expiration: u64,

    /// Refresh token lifetime in hours
    #[arg(long, env = "REFRESH_TOKEN_EXPIRATION", default_value = "720",
        value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_token_expiration: u64,

    /// bcrypt work factor for new password hashes
    #[arg(long, env = "BCRYPT_COST", default_value = "10",
        value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Falls back to a development secret with a warning when neither is set.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        warn!(
            "No JWT secret configured, using the development default. Set JWT_SECRET or use --jwt-secret-file"
        );
        DEV_JWT_SECRET.to_string()
    };

    if secret.is_empty() {
        error!("JWT secret must not be empty");
        return None;
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(db: Database, jwt_secret: String, args: &Args) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        session: SessionSettings {
            access_token_hours: args.token_expiration,
            refresh_token_hours: args.refresh_token_expiration,
            bcrypt_cost: args.bcrypt_cost,
        },
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["bookreview"]).unwrap();
        assert_eq!(args.token_expiration, 24);
        assert_eq!(args.refresh_token_expiration, 720);
        assert_eq!(args.bcrypt_cost, 10);
    }

    #[test]
    fn test_rejects_zero_lifetime() {
        assert!(Args::try_parse_from(["bookreview", "--token-expiration", "0"]).is_err());
        assert!(Args::try_parse_from(["bookreview", "--bcrypt-cost", "3"]).is_err());
    }

    #[test]
    fn test_secret_file_is_trimmed() {
        let path = std::env::temp_dir().join(format!("bookreview-secret-{}", std::process::id()));
        std::fs::write(&path, "file-secret\n").unwrap();

        // JWT_SECRET wins over the file when set
        if std::env::var("JWT_SECRET").is_err() {
            let secret = load_jwt_secret(path.to_str());
            assert_eq!(secret.as_deref(), Some("file-secret"));
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_secret_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("bookreview-empty-{}", std::process::id()));
        std::fs::write(&path, "  \n").unwrap();

        if std::env::var("JWT_SECRET").is_err() {
            assert!(load_jwt_secret(path.to_str()).is_none());
        }

        std::fs::remove_file(&path).ok();
    }
}
