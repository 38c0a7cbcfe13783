use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::handlers::heart_check::HeartCheckService;

/// How long stored session results live and how often they are swept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRetention {
    pub max_age: Duration,
    pub interval: Duration,
}

impl Default for SessionRetention {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 60 * 60),
            interval: Duration::from_secs(5 * 60),
        }
    }
}

fn positive_env(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!("Ignoring invalid {}='{}'", name, raw);
            None
        }
    }
}

impl SessionRetention {
    /// Read SESSION_TTL_MINUTES and SESSION_PRUNE_INTERVAL_SECONDS, keeping
    /// the defaults for anything unset or invalid
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_age: positive_env("SESSION_TTL_MINUTES")
                .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
                .unwrap_or(defaults.max_age),
            interval: positive_env("SESSION_PRUNE_INTERVAL_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
        }
    }
}

/// Run one retention sweep. Failures are logged and reported as nothing removed.
pub async fn prune_expired(service: &HeartCheckService, max_age: Duration) -> usize {
    match service.prune_sessions(max_age).await {
        Ok(removed) => {
            debug!("Session sweep removed {} results", removed);
            removed
        }
        Err(e) => {
            warn!("Session sweep failed: {}", e);
            0
        }
    }
}

/// Sweep expired session results in the background until the runtime stops
pub fn spawn_session_pruner(service: HeartCheckService, retention: SessionRetention) -> JoinHandle<()> {
    info!(
        "Session results expire after {}s, swept every {}s",
        retention.max_age.as_secs(),
        retention.interval.as_secs()
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(retention.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            prune_expired(&service, retention.max_age).await;
        }
    })
}
