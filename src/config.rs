//! Application configuration, read once at startup

use anyhow::{Context, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Subdirectory of the static root that receives uploaded images.
pub const UPLOADS_SUBDIR: &str = "uploads";

const DEFAULT_ADMIN_PATH: &str = "/admin226";
const DEFAULT_PORT: u16 = 5000;
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Networked database connection string, if any.
    pub database_url: Option<String>,
    /// Directory holding the embedded `database.db` file.
    pub data_dir: PathBuf,
    /// Root served under `/static`.
    pub static_dir: PathBuf,
    pub admin_path: String,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub connect_attempts: u32,
    pub connect_timeout: Duration,
    pub retry_backoff: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: None,
            data_dir: PathBuf::from("."),
            static_dir: PathBuf::from("static"),
            admin_path: DEFAULT_ADMIN_PATH.to_owned(),
            host: "0.0.0.0".to_owned(),
            port: DEFAULT_PORT,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            connect_attempts: 3,
            connect_timeout: Duration::from_secs(5),
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<AppConfig> {
        dotenvy::dotenv().ok();

        let mut config = AppConfig {
            database_url: env::var("DATABASE_URL")
                .ok()
                .map(|url| url.trim().to_owned())
                .filter(|url| !url.is_empty()),
            ..AppConfig::default()
        };

        if let Ok(dir) = env::var("FEEDBACK_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("FEEDBACK_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("ADMIN_PATH") {
            check_admin_path(&path)?;
            config.admin_path = path;
        }
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
        }

        Ok(config)
    }

    /// Location of the embedded database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("database.db")
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.join(UPLOADS_SUBDIR)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The listing path becomes a literal route next to `/`, `/submit` and
/// `/static`, so it must be a plain path that cannot shadow them or turn
/// into a parameter or wildcard route.
fn check_admin_path(path: &str) -> anyhow::Result<()> {
    let Some(rest) = path.strip_prefix('/') else {
        bail!("ADMIN_PATH must start with `/`, got {path:?}");
    };
    if rest.is_empty() || rest.ends_with('/') || rest.contains("//") {
        bail!("ADMIN_PATH must name a path below `/`, got {path:?}");
    }
    if let Some(c) = rest
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
    {
        bail!("ADMIN_PATH may not contain {c:?}, got {path:?}");
    }

    let first = rest.split('/').next().unwrap_or_default();
    if matches!(first, "submit" | "static") {
        bail!("ADMIN_PATH {path:?} overlaps the /{first} route");
    }

    Ok(())
}
