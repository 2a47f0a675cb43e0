//! Per-client rate limit for the credential routes

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::config::RateLimitConfig;
use crate::error::AppError;

/// Key used when the server was started without peer addresses
const UNKNOWN_PEER: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// One token bucket per peer IP
pub struct AuthRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl AuthRateLimiter {
    /// `None` when the limit is disabled or misconfigured
    pub fn from_config(config: &RateLimitConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let rps = NonZeroU32::new(config.requests_per_second)?;
        let burst = NonZeroU32::new(config.burst_size)?;

        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_second(rps).allow_burst(burst)),
        })
    }

    pub fn check(&self, peer: IpAddr) -> bool {
        let allowed = self.limiter.check_key(&peer).is_ok();
        // Forget buckets that have fully refilled
        self.limiter.retain_recent();
        allowed
    }
}

fn peer_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(UNKNOWN_PEER)
}

pub async fn limit_requests(
    State(limiter): State<Arc<AuthRateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = peer_ip(&request);
    if !limiter.check(peer) {
        tracing::warn!(%peer, "Credential route rate limited");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}
