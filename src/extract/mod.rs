//! Rate-limit extraction from HTTP responses
//!
//! APIs expose rate-limit information in several shapes: a handful of
//! well-known header pairs, or a JSON body in the GitHub style (`rate` /
//! `resources` objects). Extraction runs an ordered table of strategies and
//! the first one that produces both values wins; strategies are never merged.

use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

/// A normalized (remaining, limit) pair read from one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateReading {
    pub remaining: u64,
    pub limit: u64,
}

/// Extraction errors
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid value for header {header}: {value:?}")]
    BadHeaderValue { header: String, value: String },
}

/// Header pairs checked in priority order; the first pair with both headers
/// present is parsed and no later pair is consulted.
const HEADER_PAIRS: &[(&str, &str)] = &[
    ("x-ratelimit-remaining", "x-ratelimit-limit"),
    ("ratelimit-remaining", "ratelimit-limit"),
    ("x-rate-limit-remaining", "x-rate-limit-limit"),
];

type Strategy = fn(&HeaderMap, Option<&Value>) -> Result<Option<RateReading>, ExtractError>;

/// Ordered extraction strategies, first match wins
const STRATEGIES: &[(&str, Strategy)] = &[
    ("header-pairs", from_header_pairs),
    ("json-rate", from_json_rate),
    ("json-resources", from_json_resources),
];

/// Extract a rate reading from response headers and, when the response was
/// JSON, its decoded body.
///
/// Returns `Ok(None)` when no known shape matched ("not found", not an
/// error). A recognized header carrying a non-numeric value is an error.
pub fn extract(headers: &HeaderMap, body: Option<&Value>) -> Result<Option<RateReading>, ExtractError> {
    for (name, strategy) in STRATEGIES {
        if let Some(reading) = strategy(headers, body)? {
            tracing::debug!(strategy = name, remaining = reading.remaining, limit = reading.limit, "Rate limit extracted");
            return Ok(Some(reading));
        }
    }
    Ok(None)
}

fn from_header_pairs(headers: &HeaderMap, _body: Option<&Value>) -> Result<Option<RateReading>, ExtractError> {
    for (remaining_header, limit_header) in HEADER_PAIRS {
        if let (Some(remaining), Some(limit)) = (headers.get(*remaining_header), headers.get(*limit_header)) {
            return Ok(Some(RateReading {
                remaining: parse_header(remaining_header, remaining)?,
                limit: parse_header(limit_header, limit)?,
            }));
        }
    }
    Ok(None)
}

fn parse_header(name: &str, value: &HeaderValue) -> Result<u64, ExtractError> {
    let bad = |value: &str| ExtractError::BadHeaderValue {
        header: name.to_string(),
        value: value.to_string(),
    };

    let text = value.to_str().map_err(|_| bad("<non-ascii>"))?;
    text.trim().parse().map_err(|_| bad(text))
}

/// GitHub-style `{"rate": {"remaining": .., "limit": ..}}`
fn from_json_rate(_headers: &HeaderMap, body: Option<&Value>) -> Result<Option<RateReading>, ExtractError> {
    let Some(rate) = body.and_then(|b| b.get("rate")) else {
        return Ok(None);
    };
    Ok(reading_from_object(rate))
}

/// GitHub-style `{"resources": {..}}`: the first resource object carrying
/// both `remaining` and `limit` wins.
fn from_json_resources(_headers: &HeaderMap, body: Option<&Value>) -> Result<Option<RateReading>, ExtractError> {
    let Some(resources) = body.and_then(|b| b.get("resources")).and_then(Value::as_object) else {
        return Ok(None);
    };
    Ok(resources.values().find_map(reading_from_object))
}

fn reading_from_object(value: &Value) -> Option<RateReading> {
    Some(RateReading {
        remaining: value.get("remaining")?.as_u64()?,
        limit: value.get("limit")?.as_u64()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers_of(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn test_standard_header_pair() {
        let headers = headers_of(&[("X-RateLimit-Remaining", "10"), ("X-RateLimit-Limit", "100")]);
        let reading = extract(&headers, None).unwrap().unwrap();
        assert_eq!(reading, RateReading { remaining: 10, limit: 100 });
    }

    #[test]
    fn test_header_pair_priority() {
        // Both the X- and the bare pair present: the first pair wins
        let headers = headers_of(&[
            ("X-RateLimit-Remaining", "10"),
            ("X-RateLimit-Limit", "100"),
            ("RateLimit-Remaining", "5"),
            ("RateLimit-Limit", "50"),
        ]);
        let reading = extract(&headers, None).unwrap().unwrap();
        assert_eq!(reading, RateReading { remaining: 10, limit: 100 });
    }

    #[test]
    fn test_dashed_header_pair() {
        let headers = headers_of(&[
            ("X-Rate-Limit-Remaining", "3"),
            ("X-Rate-Limit-Limit", "60"),
        ]);
        let reading = extract(&headers, None).unwrap().unwrap();
        assert_eq!(reading, RateReading { remaining: 3, limit: 60 });
    }

    #[test]
    fn test_incomplete_pair_is_not_found() {
        let headers = headers_of(&[("X-RateLimit-Remaining", "10")]);
        assert_eq!(extract(&headers, None).unwrap(), None);
    }

    #[test]
    fn test_non_numeric_header_is_error() {
        let headers = headers_of(&[
            ("X-RateLimit-Remaining", "lots"),
            ("X-RateLimit-Limit", "100"),
        ]);
        assert!(matches!(
            extract(&headers, None),
            Err(ExtractError::BadHeaderValue { .. })
        ));
    }

    #[test]
    fn test_json_rate_object() {
        let body = json!({ "rate": { "remaining": 42, "limit": 5000 } });
        let reading = extract(&HeaderMap::new(), Some(&body)).unwrap().unwrap();
        assert_eq!(reading, RateReading { remaining: 42, limit: 5000 });
    }

    #[test]
    fn test_json_rate_beats_resources() {
        let body = json!({
            "rate": { "remaining": 42, "limit": 5000 },
            "resources": { "core": { "remaining": 1, "limit": 10 } },
        });
        let reading = extract(&HeaderMap::new(), Some(&body)).unwrap().unwrap();
        assert_eq!(reading, RateReading { remaining: 42, limit: 5000 });
    }

    #[test]
    fn test_json_resources_first_complete_entry() {
        let body = json!({
            "resources": {
                "incomplete": { "remaining": 7 },
                "core": { "remaining": 99, "limit": 5000 },
            },
        });
        let reading = extract(&HeaderMap::new(), Some(&body)).unwrap().unwrap();
        assert_eq!(reading, RateReading { remaining: 99, limit: 5000 });
    }

    #[test]
    fn test_headers_beat_json_body() {
        let headers = headers_of(&[("X-RateLimit-Remaining", "10"), ("X-RateLimit-Limit", "100")]);
        let body = json!({ "rate": { "remaining": 1, "limit": 2 } });
        let reading = extract(&headers, Some(&body)).unwrap().unwrap();
        assert_eq!(reading, RateReading { remaining: 10, limit: 100 });
    }

    #[test]
    fn test_nothing_recognized_is_not_found() {
        let body = json!({ "message": "hello" });
        assert_eq!(extract(&HeaderMap::new(), Some(&body)).unwrap(), None);
        assert_eq!(extract(&HeaderMap::new(), None).unwrap(), None);
    }
}
