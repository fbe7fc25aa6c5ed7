use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://\S+$").unwrap());

pub fn looks_like_url(input: &str) -> bool {
    URL_RE.is_match(input.trim())
}

/// Endpoint family spoken by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Flavor {
    /// `explore`, `discover` and `trace`, one call per action.
    Unified,
    /// `whywatch` + `recs`, `playlist` and `timeline` from the early prototype.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Explore,
    Discover,
    Trace,
    WhyWatch,
    Recs,
    Playlist,
    Timeline,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explore => "explore",
            Self::Discover => "discover",
            Self::Trace => "trace",
            Self::WhyWatch => "whywatch",
            Self::Recs => "recs",
            Self::Playlist => "playlist",
            Self::Timeline => "timeline",
        }
    }

    pub fn path(self) -> String {
        format!("/api/{}", self.as_str())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an `explore` (and legacy `whywatch`/`recs`) call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExploreRequest {
    Url(String),
    Query(String),
}

impl ExploreRequest {
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim().to_string();
        if looks_like_url(&trimmed) {
            Self::Url(trimmed)
        } else {
            Self::Query(trimmed)
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Query(_) => None,
        }
    }
}

/// Body of a `trace` (and legacy `timeline`) call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceRequest {
    Url(String),
    Topic(String),
}

impl TraceRequest {
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim().to_string();
        if looks_like_url(&trimmed) {
            Self::Url(trimmed)
        } else {
            Self::Topic(trimmed)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoverRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mood: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub activity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub free_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mood_activity: String,
}

impl DiscoverRequest {
    /// Chips are given in toggle order. The combined label is the chips joined
    /// by `", "`, or the free text when no chip is selected.
    pub fn new(
        moods: &[&str],
        activities: &[&str],
        chips_in_order: &[&str],
        free_text: &str,
    ) -> Self {
        let free_text = free_text.trim().to_string();
        let mood_activity = if chips_in_order.is_empty() {
            free_text.clone()
        } else {
            chips_in_order.join(", ")
        };

        Self {
            mood: moods.join(", "),
            activity: activities.join(", "),
            free_text,
            mood_activity,
        }
    }

    pub fn legacy(&self) -> LegacyPlaylistRequest {
        LegacyPlaylistRequest {
            mood: self.mood_activity.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyPlaylistRequest {
    pub mood: String,
}

/// Response envelope. Legacy replies carry no `success` field and are
/// treated as successful.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Envelope {
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }

    pub fn rejection_message(&self) -> String {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or("request was not successful")
            .to_string()
    }

    /// The first non-null field among `keys`, or the whole body.
    pub fn payload(&self, keys: &[&str]) -> Value {
        keys.iter()
            .find_map(|key| self.body.get(*key).filter(|value| !value.is_null()))
            .cloned()
            .unwrap_or_else(|| Value::Object(self.body.clone()))
    }
}

/// A talk record as sent by whichever backend revision answered. Field names
/// vary, so lookups go through first-non-empty chains.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawTalk(Map<String, Value>);

impl RawTalk {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Trimmed, non-empty string under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn first_text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Numeric value under `key`; numeric strings are accepted.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn first_number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| self.number(key))
    }

    pub fn object(&self, key: &str) -> Option<RawTalk> {
        self.get(key).and_then(Self::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explore_request_picks_url_or_query() {
        let by_url = ExploreRequest::from_input("  https://ted.com/talks/dan_pink ");
        assert_eq!(
            serde_json::to_value(&by_url).unwrap(),
            json!({ "url": "https://ted.com/talks/dan_pink" })
        );

        let by_query = ExploreRequest::from_input("creativity in schools");
        assert_eq!(
            serde_json::to_value(&by_query).unwrap(),
            json!({ "query": "creativity in schools" })
        );
    }

    #[test]
    fn trace_request_serializes_topic() {
        let request = TraceRequest::from_input("Artificial Intelligence");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "topic": "Artificial Intelligence" })
        );
    }

    #[test]
    fn discover_request_omits_empty_fields() {
        let request = DiscoverRequest::new(&["Curious"], &[], &["Curious"], "");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "mood": "Curious", "mood_activity": "Curious" })
        );
    }

    #[test]
    fn discover_request_falls_back_to_free_text_label() {
        let request = DiscoverRequest::new(&[], &[], &[], "  rainy sunday ");
        assert_eq!(request.mood_activity, "rainy sunday");
        assert_eq!(
            serde_json::to_value(request.legacy()).unwrap(),
            json!({ "mood": "rainy sunday" })
        );
    }

    #[test]
    fn envelope_detects_rejection() {
        let envelope: Envelope =
            serde_json::from_value(json!({ "success": false, "error": "quota exceeded" })).unwrap();
        assert!(envelope.is_rejected());
        assert_eq!(envelope.rejection_message(), "quota exceeded");

        let legacy: Envelope = serde_json::from_value(json!({ "text": "hello" })).unwrap();
        assert!(!legacy.is_rejected());
        assert_eq!(legacy.payload(&["data"]), json!({ "text": "hello" }));
    }

    #[test]
    fn raw_talk_skips_blank_values() {
        let raw: RawTalk = serde_json::from_value(json!({
            "title": "   ",
            "name": "The Rise of AI",
            "year": "2017"
        }))
        .unwrap();

        assert_eq!(raw.first_text(&["title", "name"]), Some("The Rise of AI"));
        assert_eq!(raw.number("year"), Some(2017.0));
    }
}
