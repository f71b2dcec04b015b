use clap::Parser;
use std::time::Duration;

use crate::gateway::DEFAULT_GATEWAY_URL;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "prompt-gateway")]
#[command(about = "Rate limited proxy for image generation and chat endpoints")]
pub struct Args {
    // Address to bind
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Base URL of the chat-completion API
    #[arg(short, long, env = "AI_GATEWAY_URL", default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    // Bearer token for the chat-completion API. Handlers answer 503 without it.
    #[arg(long, env = "AI_GATEWAY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // Timeout for each upstream call in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT", default_value_t = 120)]
    pub upstream_timeout: u64,

    // Rate limit window in seconds, shared by all endpoints
    #[arg(long, env = "RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // How often expired rate limit entries are dropped, in seconds
    #[arg(long, env = "SWEEP_INTERVAL", default_value_t = 60)]
    pub sweep_interval: u64,

    // Largest accepted request body
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 64 * 1024 * 1024)]
    pub max_body_bytes: usize,
}

impl Args {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    pub fn sweep_interval(&self) -> Duration {
        // tokio intervals panic on zero
        Duration::from_secs(self.sweep_interval.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_joins_host_and_port() {
        let args = Args::try_parse_from(["prompt-gateway", "--host", "127.0.0.1", "--port", "8080"])
            .unwrap();
        assert_eq!(args.bind_address(), "127.0.0.1:8080");
        assert_eq!(args.upstream_timeout(), Duration::from_secs(args.upstream_timeout));
        assert!(args.sweep_interval() >= Duration::from_secs(1));
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "prompt-gateway",
            "--port",
            "9000",
            "--gateway-url",
            "http://localhost:4000/v1",
            "--api-key",
            "secret",
            "--sweep-interval",
            "0",
        ])
        .unwrap();
        assert_eq!(args.port, 9000);
        assert_eq!(args.gateway_url, "http://localhost:4000/v1");
        assert_eq!(args.api_key.as_deref(), Some("secret"));
        assert_eq!(args.sweep_interval(), Duration::from_secs(1));
    }
}
