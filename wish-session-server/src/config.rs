use std::net::SocketAddr;

/// Default listen port when PORT is unset or unparsable
pub const DEFAULT_PORT: u16 = 3000;

/// Process configuration. The only external surface is the listen
/// port, taken from the PORT environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_socket_addr_binds_all_interfaces() {
        let config = Config { port: 8080 };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }
}
