use serde::Deserialize;

/// Value of `DATABASE_URL` that selects the in-process stores instead of Postgres.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_secs: i64,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sessionId".into(),
            max_age_secs: 60 * 60 * 24 * 7, // 7 days
            secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let session = SessionConfig {
            secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            ..SessionConfig::default()
        };
        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            session,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_lives_for_a_week() {
        let session = SessionConfig::default();
        assert_eq!(session.cookie_name, "sessionId");
        assert_eq!(session.max_age_secs, 604_800);
        assert!(!session.secure);
    }

    #[test]
    fn memory_url_selects_memory_store() {
        let cfg = AppConfig {
            database_url: MEMORY_DATABASE_URL.into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 3000,
            session: SessionConfig::default(),
        };
        assert!(cfg.uses_memory_store());
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    }
}
