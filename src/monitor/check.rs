//! Usage evaluation

use std::fmt;

/// Usage fraction at or above which an alert is classified critical
pub const CRITICAL_USAGE: f64 = 0.95;

/// Result of one rate-limit check, discarded after the cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckResult {
    pub remaining: u64,
    pub limit: u64,
    /// Fraction of the limit consumed, 0.0 when the limit is zero
    pub usage: f64,
}

impl CheckResult {
    /// Compute the usage fraction for a (remaining, limit) reading.
    ///
    /// A zero limit yields zero usage rather than dividing by zero, and a
    /// remaining value above the limit clamps to zero usage.
    pub fn new(remaining: u64, limit: u64) -> Self {
        let usage = if limit > 0 {
            limit.saturating_sub(remaining) as f64 / limit as f64
        } else {
            0.0
        };
        Self {
            remaining,
            limit,
            usage,
        }
    }

    /// Whether this result crosses the given threshold (inclusive)
    pub fn is_over(&self, threshold: f64) -> bool {
        self.usage >= threshold
    }

    /// Severity classification for an alert on this result
    pub fn severity(&self) -> Severity {
        if self.usage >= CRITICAL_USAGE {
            Severity::Critical
        } else {
            Severity::Warning
        }
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    /// Marker prefixed to alert messages, visibly distinct per severity
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Warning => "\u{26a0}\u{fe0f}",
            Severity::Critical => "\u{1f6a8}",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}
