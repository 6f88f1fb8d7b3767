use crate::config::RpcConfig;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("Request timeout: {method} after {timeout_ms}ms")]
    Timeout { method: &'static str, timeout_ms: u64 },

    #[error("Request failed: {method}: {message}")]
    RequestFailed { method: &'static str, message: String },

    #[error("Invalid response: {method}: {message}")]
    InvalidResponse { method: &'static str, message: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl RpcError {
    pub fn request_failed(method: &'static str, message: impl ToString) -> Self {
        RpcError::RequestFailed {
            method,
            message: message.to_string(),
        }
    }

    pub fn invalid_response(method: &'static str, message: impl ToString) -> Self {
        RpcError::InvalidResponse {
            method,
            message: message.to_string(),
        }
    }
}

pub type RpcResult<T> = Result<T, RpcError>;

/// Timeout and retry policy for the contract-call path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first one
    pub retry_count: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RpcConfig) -> Self {
        Self {
            timeout: config.timeout(),
            retry_count: config.retry_count,
            retry_delay: config.retry_delay(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub retries: u64,
    pub timeouts: u64,
}

impl RpcStats {
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            1.0
        } else {
            (self.successful_requests as f64) / (self.total_requests as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_default_config() {
        let policy = RetryPolicy::from_config(&RpcConfig::default());
        assert_eq!(policy.timeout, Duration::from_secs(15));
        assert_eq!(policy.retry_count, 2);
        assert_eq!(policy.retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(RpcStats::default().success_rate(), 1.0);
        let stats = RpcStats {
            total_requests: 4,
            successful_requests: 3,
            ..RpcStats::default()
        };
        assert_eq!(stats.success_rate(), 0.75);
    }
}
