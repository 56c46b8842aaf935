//! Human-readable alert messages

use chrono::{DateTime, Utc};

use crate::monitor::{CheckResult, Severity};

/// One threshold-crossing alert, ready to render for any channel
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub target: String,
    pub remaining: u64,
    pub limit: u64,
    pub usage: f64,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

impl AlertMessage {
    pub fn new(target: impl Into<String>, result: &CheckResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            target: target.into(),
            remaining: result.remaining,
            limit: result.limit,
            usage: result.usage,
            severity: result.severity(),
            timestamp,
        }
    }

    /// Render the chat message text: severity marker, target name, grouped
    /// remaining/limit, usage percentage with one decimal, and timestamp.
    pub fn render(&self) -> String {
        format!(
            "{} *Rate Limit Alert*\n*API:* {}\n*Remaining:* {} / {}\n*Usage:* {:.1}%\n*Time:* {}",
            self.severity.marker(),
            self.target,
            group_thousands(self.remaining),
            group_thousands(self.limit),
            self.usage * 100.0,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Format an integer with thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
