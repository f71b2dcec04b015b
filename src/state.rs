use std::sync::Arc;
use std::time::Duration;

use crate::endpoint::Endpoint;
use crate::gateway::GatewayClient;
use crate::rate_limit::{RateLimitPolicy, RateLimiter};

// app's shared state
pub struct AppState {
    pub gateway: GatewayClient,
    pub rate_limiter: RateLimiter,
    pub rate_window: Duration, // window shared by every endpoint
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(gateway: GatewayClient, rate_limiter: RateLimiter, rate_window: Duration) -> Self {
        Self {
            gateway,
            rate_limiter,
            rate_window,
        }
    }

    pub fn policy(&self, endpoint: Endpoint) -> RateLimitPolicy {
        endpoint.policy(self.rate_window)
    }
}
