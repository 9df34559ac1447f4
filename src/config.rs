//! Environment-driven runtime configuration, read once at startup.

use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Settings the server needs before it can accept a request. `DATABASE_URL`
/// is mandatory; host and port fall back to local-development defaults.
/// The JWT signing secret is read lazily by the token module, not here,
/// since only the auth paths need it.
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.parse().expect("SERVER_PORT must be a number"),
            Err(_) => DEFAULT_PORT,
        };
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
        }
    }

    /// Address pair for `HttpServer::bind`.
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://cardstack_test");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");

        let config = Config::from_env();
        assert_eq!(config.database_url, "postgres://cardstack_test");
        assert_eq!(config.bind_addr(), (DEFAULT_HOST, DEFAULT_PORT));

        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");

        let config = Config::from_env();
        assert_eq!(config.bind_addr(), ("0.0.0.0", 3000));
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");
    }
}
