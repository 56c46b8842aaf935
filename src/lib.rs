//! Ratewatch: API Rate Limit Monitor
//!
//! Polls external HTTP APIs for rate-limit usage and sends threshold-crossing
//! alerts to Slack and Discord. Targets live in a JSON document and are
//! checked on a fixed interval; each check fetches the endpoint, extracts a
//! (remaining, limit) reading from a handful of known header and JSON body
//! shapes, computes the usage fraction, and alerts when the target's
//! threshold is crossed.
//!
//! # Example
//!
//! ```no_run
//! use ratewatch::monitor::RateLimitMonitor;
//! use ratewatch::notify::Notifier;
//! use ratewatch::registry::{MonitoredTarget, TargetRegistry};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = TargetRegistry::load("apis.json")?;
//! registry.add(
//!     MonitoredTarget::new("github", "https://api.github.com/rate_limit")
//!         .with_threshold(0.9),
//! )?;
//!
//! let mut monitor = RateLimitMonitor::new(registry, Notifier::new(vec![]));
//! monitor.run_pass().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod extract;
pub mod monitor;
pub mod notify;
pub mod registry;

// Re-export commonly used types
pub use extract::{ExtractError, RateReading};
pub use monitor::{CheckResult, RateLimitMonitor, Severity};
pub use notify::{AlertMessage, Channel, Notifier};
pub use registry::{MonitoredTarget, RegistryError, TargetRegistry};
