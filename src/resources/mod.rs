//! Typed facades over the WAVE REST surface.
//!
//! Each facade owns its own handle to the shared executor, validates
//! request models before anything touches the wire, and decodes raw
//! responses into the typed models under [`crate::models`].

mod experiment_data;
mod experiment_types;
mod experiments;
mod search;
mod tags;

pub use experiment_data::ExperimentData;
pub use experiment_types::ExperimentTypes;
pub use experiments::Experiments;
pub use search::Search;
pub use tags::Tags;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{Result, WaveError};

/// Rejects blank path identifiers before they reach the wire.
pub(crate) fn require_id<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WaveError::validation(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

/// Renders query pairs as a `?`-prefixed string, or nothing when empty.
pub(crate) fn query_string(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    format!("?{}", serializer.finish())
}

/// Decodes a raw response value into a typed model.
pub(crate) fn decode<T: DeserializeOwned>(value: JsonValue) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|err| WaveError::Decode(format!("unexpected response shape: {err}")))
}

/// Serializes a request model into a JSON body.
pub(crate) fn to_body<T: Serialize>(model: &T) -> Result<JsonValue> {
    serde_json::to_value(model)
        .map_err(|err| WaveError::Decode(format!("unencodable request body: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{query_string, require_id};

    #[test]
    fn identifiers_are_trimmed_and_checked() {
        assert_eq!(
            require_id("  4f6c  ", "experiment id").expect("must accept"),
            "4f6c"
        );
        assert!(require_id("   ", "experiment id").is_err());
    }

    #[test]
    fn query_strings_are_prefixed_and_escaped() {
        assert_eq!(query_string(&[]), "");
        let rendered = query_string(&[
            ("skip", "0".to_string()),
            ("participant_id", "p 01".to_string()),
        ]);
        assert_eq!(rendered, "?skip=0&participant_id=p+01");
    }
}
