//! Monitored target definition

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RegistryError;
use crate::monitor::CheckResult;

/// Default alert threshold for new targets
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// One monitored API endpoint with its alert threshold and last-seen state.
///
/// The name doubles as the key of the persisted document, so it is skipped
/// during (de)serialization and filled back in by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredTarget {
    /// Unique target name (persisted as the document key)
    #[serde(skip)]
    pub name: String,
    /// Endpoint URL to poll
    pub endpoint: String,
    /// Request headers to send with each poll
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Usage fraction at or above which an alert fires
    pub threshold: f64,
    /// Timestamp of the last successful check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<DateTime<Utc>>,
    /// Remaining quota observed at the last check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_remaining: Option<u64>,
    /// Quota limit observed at the last check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_limit: Option<u64>,
}

impl MonitoredTarget {
    /// Create a new target with the default threshold and no last-seen state
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            threshold: DEFAULT_THRESHOLD,
            last_check: None,
            last_remaining: None,
            last_limit: None,
        }
    }

    /// Set request headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the alert threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Validate the registry invariants for this target
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if !(0.0..=1.0).contains(&self.threshold) || self.threshold.is_nan() {
            return Err(RegistryError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Fold a successful check into the last-seen fields
    pub fn record_check(&mut self, result: &CheckResult, at: DateTime<Utc>) {
        self.last_check = Some(at);
        // last_remaining stays within last_limit even for odd upstream data
        self.last_remaining = Some(result.remaining.min(result.limit));
        self.last_limit = Some(result.limit);
    }
}
