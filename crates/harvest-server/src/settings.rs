use harvest_core::AppError;

pub const DEFAULT_PROJECT_NAME: &str = "Web Analysis System";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Log output format for the server binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// HTTP server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub project_name: String,
    /// Prefix every entity route is nested under, e.g. `/api/v1`.
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Read settings from `HARVEST_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let port = match std::env::var("HARVEST_SERVER_PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                AppError::operation(
                    "Configuration",
                    format!("failed: invalid HARVEST_SERVER_PORT '{raw}'"),
                )
            })?,
            Err(_) => defaults.port,
        };

        let log_format = match std::env::var("HARVEST_LOG_FORMAT") {
            Ok(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            project_name: std::env::var("HARVEST_PROJECT_NAME")
                .unwrap_or(defaults.project_name),
            api_prefix: normalize_prefix(
                &std::env::var("HARVEST_API_PREFIX").unwrap_or(defaults.api_prefix),
            ),
            host: std::env::var("HARVEST_SERVER_HOST").unwrap_or(defaults.host),
            port,
            log_format,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Leading slash, no trailing slash. An empty prefix stays empty.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
