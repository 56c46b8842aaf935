//! Check cycle: usage evaluation, HTTP fetch, and the scheduler loop

pub mod check;
pub mod checker;
pub mod fetch;

pub use check::{CheckResult, Severity, CRITICAL_USAGE};
pub use checker::{CheckError, RateLimitMonitor};
pub use fetch::{FetchError, FetchOutcome, Fetcher, FETCH_TIMEOUT};
