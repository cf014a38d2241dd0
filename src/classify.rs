use std::time::{Duration, SystemTime};

use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use serde_json::Value as JsonValue;

use crate::WaveError;

/// Delay assumed when a `Retry-After` header is present but unreadable.
pub(crate) const UNPARSEABLE_RETRY_AFTER: Duration = Duration::from_millis(5_000);

/// Classified outcome of one dispatched attempt.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Status below 400, body parsed.
    Success(JsonValue),
    /// Terminal failure; retrying the same request cannot help.
    Fatal(WaveError),
    /// Transient failure worth retrying, with the server's delay hint when
    /// it sent one.
    Retry {
        error: WaveError,
        hint: Option<Duration>,
    },
}

/// Maps an HTTP response onto the error taxonomy.
///
/// Pure over its inputs: the same status, headers and body always produce
/// the same outcome. `now` anchors `Retry-After` dates.
pub(crate) fn classify_response(
    status: u16,
    headers: &HeaderMap,
    body: &str,
    now: SystemTime,
) -> Outcome {
    if status < 400 {
        return match parse_success_body(status, headers, body) {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Fatal(error),
        };
    }

    let (message, detail) = extract_error_fields(status, headers, body);
    match status {
        400 => Outcome::Fatal(WaveError::Validation { message, detail }),
        401 => Outcome::Fatal(WaveError::Authentication { message, detail }),
        403 => Outcome::Fatal(WaveError::Authorization { message, detail }),
        404 => Outcome::Fatal(WaveError::NotFound { message, detail }),
        429 => {
            let hint = parse_retry_after(headers, now);
            Outcome::Retry {
                error: WaveError::RateLimited {
                    message,
                    detail,
                    retry_after: hint,
                },
                hint,
            }
        }
        500 | 502 | 503 | 504 => Outcome::Retry {
            error: WaveError::ServerFault {
                status,
                message,
                detail,
            },
            hint: None,
        },
        _ => Outcome::Fatal(WaveError::Unclassified {
            status,
            message,
            detail,
        }),
    }
}

/// Maps a transport failure onto the error taxonomy. Both kinds are
/// transient.
pub(crate) fn classify_transport(err: &reqwest::Error) -> WaveError {
    if err.is_timeout() {
        WaveError::Timeout {
            message: err.to_string(),
        }
    } else {
        WaveError::Network {
            message: err.to_string(),
        }
    }
}

/// Parses a `Retry-After` header into a wait duration.
///
/// Accepts whole seconds or an HTTP-date; a date already in the past counts
/// as zero. A header that is present but unreadable yields
/// [`UNPARSEABLE_RETRY_AFTER`]. Absent header yields `None` so the backoff
/// schedule decides.
pub(crate) fn parse_retry_after(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?;
    let text = match raw.to_str() {
        Ok(text) => text.trim(),
        Err(_) => return Some(UNPARSEABLE_RETRY_AFTER),
    };
    if let Ok(seconds) = text.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    match httpdate::parse_http_date(text) {
        Ok(when) => Some(when.duration_since(now).unwrap_or(Duration::ZERO)),
        Err(_) => Some(UNPARSEABLE_RETRY_AFTER),
    }
}

fn parse_success_body(status: u16, headers: &HeaderMap, body: &str) -> Result<JsonValue, WaveError> {
    if !is_json(headers) {
        return Ok(serde_json::json!({ "message": body }));
    }
    serde_json::from_str(body).map_err(|err| WaveError::Unclassified {
        status,
        message: format!("invalid JSON in response body: {err}"),
        detail: (!body.is_empty()).then(|| body.to_owned()),
    })
}

fn extract_error_fields(status: u16, headers: &HeaderMap, body: &str) -> (String, Option<String>) {
    let parsed: Option<JsonValue> = is_json(headers)
        .then(|| serde_json::from_str(body).ok())
        .flatten();

    let message = parsed
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP {status} error"));

    let detail = parsed
        .as_ref()
        .and_then(|value| value.get("detail"))
        .map(json_to_text)
        .or_else(|| (!body.is_empty()).then(|| body.to_owned()));

    (message, detail)
}

fn json_to_text(value: &JsonValue) -> String {
    match value.as_str() {
        Some(text) => text.to_owned(),
        None => value.to_string(),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}
