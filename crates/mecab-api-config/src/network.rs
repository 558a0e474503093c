use serde::{Deserialize, Serialize};

/// Environment variable through which Server::Starter hands down listening sockets
pub const SERVER_STARTER_PORT: &str = "SERVER_STARTER_PORT";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_fallback_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Address bound when no supervisor hands down a socket
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_fallback_port")]
    pub fallback_port: u16,
    /// Name of the socket handoff variable
    pub handoff_env: String,
}

impl NetworkConfig {
    pub fn from_env<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("MECAB_API_HOST").unwrap_or_else(default_host);

        let fallback_port = lookup("MECAB_API_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_fallback_port);

        Self {
            host,
            fallback_port,
            handoff_env: SERVER_STARTER_PORT.to_string(),
        }
    }

    pub fn fallback_addr(&self) -> String {
        format!("{}:{}", self.host, self.fallback_port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::from_env(&|_| None)
    }
}
