//! Maps backend payloads into fixed display records.
//!
//! Every field is resolved through a first-non-empty chain over the names
//! the various backend revisions have used. Records that end up without a
//! title or url are dropped.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use html_escape::decode_html_entities;
use serde_json::Value;

use crate::protocol::{ExploreRequest, RawTalk};

pub const PLACEHOLDER_THUMBNAIL: &str = "/api/placeholder/200/150";
pub const FEATURED_PLACEHOLDER_THUMBNAIL: &str = "/api/placeholder/400/300";
pub const UNKNOWN_DATE: &str = "Date unknown";
pub const DEFAULT_CATEGORY: &str = "Recommended";

const TITLE_KEYS: &[&str] = &["title", "name", "talk_title"];
const SPEAKER_KEYS: &[&str] = &["speaker", "presenter", "author"];
const URL_KEYS: &[&str] = &["url", "link", "talk_url"];
const THUMBNAIL_KEYS: &[&str] = &["thumbnail", "thumbnail_url", "image"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "published_timestamp"];
const SUMMARY_KEYS: &[&str] = &["summary", "description"];
const INSIGHT_KEYS: &[&str] = &["why_watch", "insight", "one_liner", "text"];
const GROUP_LABEL_KEYS: &[&str] = &["category", "label", "name"];
const GROUP_ITEMS_KEYS: &[&str] = &["talks", "items"];

/// Keys under which list payloads are nested, outermost first.
pub const PLAYLIST_KEYS: &[&str] = &["data", "recommendations", "playlist", "talks"];
pub const TIMELINE_KEYS: &[&str] = &["data", "timeline", "talks"];
pub const RECOMMENDATION_KEYS: &[&str] = &["recommendations", "recs", "list"];

/// Millisecond timestamps are told apart from second timestamps by size.
const MILLIS_THRESHOLD: f64 = 1e11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkRef {
    pub title: String,
    pub speaker: Option<String>,
    pub url: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationGroup {
    pub category: String,
    pub talks: Vec<TalkRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub talk: TalkRef,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub talk: TalkRef,
    pub display_date: String,
    pub sort_key: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExploreResult {
    pub talk: Option<TalkRef>,
    pub summary: String,
    pub insight: String,
    pub recommendations: Vec<RecommendationGroup>,
}

pub fn title(raw: &RawTalk) -> Option<String> {
    first_flat(raw, TITLE_KEYS)
}

pub fn speaker(raw: &RawTalk) -> Option<String> {
    first_flat(raw, SPEAKER_KEYS)
}

/// First value among `keys` that is still non-empty once entities are
/// decoded and whitespace is collapsed.
fn first_flat(raw: &RawTalk, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| raw.text(key))
        .map(flatten)
        .find(|text| !text.is_empty())
}

pub fn url(raw: &RawTalk) -> Option<String> {
    raw.first_text(URL_KEYS).map(ToOwned::to_owned)
}

/// Backend thumbnail, or `default` when none is given.
pub fn thumbnail(raw: &RawTalk, default: &str) -> String {
    raw.first_text(THUMBNAIL_KEYS)
        .unwrap_or(default)
        .to_string()
}

/// Tags from an array or a comma separated string. Trimmed, empties and
/// duplicates removed, order kept.
pub fn tags(raw: &RawTalk) -> Vec<String> {
    let candidates: Vec<String> = match raw.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(flatten)
            .collect(),
        Some(Value::String(text)) => text.split(',').map(flatten).collect(),
        _ => Vec::new(),
    };

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

pub fn display_date(raw: &RawTalk) -> String {
    if let Some(text) = first_flat(raw, &["display_date"]) {
        return text;
    }

    published_at(raw)
        .map(|at| format_long_date(at.date_naive()))
        .or_else(|| calendar_label(raw))
        .or_else(|| timestamp(raw).map(|at| format_long_date(at.date_naive())))
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// Seconds since the epoch used to order timelines; `0` when no date field
/// can be read.
pub fn sort_key(raw: &RawTalk) -> i64 {
    timestamp(raw)
        .or_else(|| published_at(raw))
        .or_else(|| {
            calendar_date(raw)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc())
        })
        .map(|at| at.timestamp())
        .unwrap_or(0)
}

pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn timestamp(raw: &RawTalk) -> Option<DateTime<Utc>> {
    let value = raw.first_number(TIMESTAMP_KEYS)?;
    if !value.is_finite() {
        return None;
    }

    let seconds = if value.abs() > MILLIS_THRESHOLD {
        value / 1_000.0
    } else {
        value
    };

    DateTime::from_timestamp(seconds.trunc() as i64, 0)
}

fn published_at(raw: &RawTalk) -> Option<DateTime<Utc>> {
    let text = raw.text("date_published")?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Calendar fields shown only as precisely as the backend gave them:
/// `2017`, `March 2017` or `March 22, 2017`.
fn calendar_label(raw: &RawTalk) -> Option<String> {
    let date = calendar_date(raw)?;
    let format = match (raw.number("month"), raw.number("day")) {
        (Some(_), Some(_)) => "%B %-d, %Y",
        (Some(_), None) => "%B %Y",
        (None, _) => "%Y",
    };

    Some(date.format(format).to_string())
}

/// `year` with optional `month` and `day`, which default to 1.
fn calendar_date(raw: &RawTalk) -> Option<NaiveDate> {
    let year = raw.number("year")?;
    let month = raw.number("month").unwrap_or(1.0);
    let day = raw.number("day").unwrap_or(1.0);

    if year < 0.0 || month < 1.0 || day < 1.0 {
        return None;
    }

    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
}

pub fn talk_ref(raw: &RawTalk, default_thumbnail: &str) -> Option<TalkRef> {
    Some(TalkRef {
        title: title(raw)?,
        speaker: speaker(raw),
        url: url(raw)?,
        thumbnail: thumbnail(raw, default_thumbnail),
    })
}

pub fn playlist(payload: &Value) -> Vec<PlaylistEntry> {
    list_items(payload, PLAYLIST_KEYS)
        .iter()
        .filter_map(RawTalk::from_value)
        .filter_map(|raw| {
            let talk = talk_ref(&raw, PLACEHOLDER_THUMBNAIL)?;
            Some(PlaylistEntry {
                talk,
                tags: tags(&raw),
            })
        })
        .collect()
}

/// Timeline entries in non-decreasing sort-key order. Ties keep the backend
/// order.
pub fn timeline(payload: &Value) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = list_items(payload, TIMELINE_KEYS)
        .iter()
        .filter_map(RawTalk::from_value)
        .filter_map(|raw| {
            let talk = talk_ref(&raw, PLACEHOLDER_THUMBNAIL)?;
            Some(TimelineEntry {
                talk,
                display_date: display_date(&raw),
                sort_key: sort_key(&raw),
            })
        })
        .collect();

    entries.sort_by_key(|entry| entry.sort_key);
    entries
}

/// Accepts a category-keyed map, a list of `{category, talks}` groups, or a
/// flat list of talks. Empty groups are dropped.
pub fn recommendation_groups(payload: &Value) -> Vec<RecommendationGroup> {
    let groups: Vec<(String, &[Value])> = match payload {
        Value::Object(map) => map
            .iter()
            .filter_map(|(category, talks)| {
                talks
                    .as_array()
                    .map(|talks| (category.clone(), talks.as_slice()))
            })
            .collect(),
        Value::Array(items) if items.iter().any(is_group) => items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|group| {
                let talks = GROUP_ITEMS_KEYS
                    .iter()
                    .find_map(|key| group.get(*key).and_then(Value::as_array))?;
                let category = GROUP_LABEL_KEYS
                    .iter()
                    .find_map(|key| group.get(*key).and_then(Value::as_str))
                    .unwrap_or(DEFAULT_CATEGORY)
                    .to_string();
                Some((category, talks.as_slice()))
            })
            .collect(),
        Value::Array(items) => vec![(DEFAULT_CATEGORY.to_string(), items.as_slice())],
        _ => Vec::new(),
    };

    groups
        .into_iter()
        .filter_map(|(category, talks)| {
            let talks: Vec<TalkRef> = talks
                .iter()
                .filter_map(RawTalk::from_value)
                .filter_map(|raw| talk_ref(&raw, PLACEHOLDER_THUMBNAIL))
                .collect();

            if talks.is_empty() {
                return None;
            }

            let category = flatten(&category);
            Some(RecommendationGroup {
                category: if category.is_empty() {
                    DEFAULT_CATEGORY.to_string()
                } else {
                    category
                },
                talks,
            })
        })
        .collect()
}

/// Unified `explore` reply: `{talk?, summary, why_watch, recommendations?}`,
/// usually nested under `data`.
pub fn explore(payload: &Value, request: &ExploreRequest) -> ExploreResult {
    let Some(root) = RawTalk::from_value(payload) else {
        return ExploreResult {
            talk: featured_talk(None, request),
            ..ExploreResult::default()
        };
    };

    let talk_record = root.object("talk");
    let summary = first_flat(&root, SUMMARY_KEYS)
        .or_else(|| {
            talk_record
                .as_ref()
                .and_then(|talk| first_flat(talk, SUMMARY_KEYS))
        })
        .unwrap_or_default();
    let insight = first_flat(&root, INSIGHT_KEYS).unwrap_or_default();
    let recommendations = RECOMMENDATION_KEYS
        .iter()
        .find_map(|key| root.get(key))
        .map(recommendation_groups)
        .unwrap_or_default();

    ExploreResult {
        talk: featured_talk(Some(talk_record.as_ref().unwrap_or(&root)), request),
        summary,
        insight,
        recommendations,
    }
}

/// Legacy fan-out: `whywatch` answers `{text}`, `recs` answers `{list}`.
pub fn explore_legacy(why_watch: &Value, recs: &Value, request: &ExploreRequest) -> ExploreResult {
    let why = RawTalk::from_value(why_watch).unwrap_or_default();
    let recs_root = RawTalk::from_value(recs).unwrap_or_default();

    let talk_record = why.object("talk").or_else(|| recs_root.object("talk"));
    let recommendations = RECOMMENDATION_KEYS
        .iter()
        .find_map(|key| recs_root.get(key))
        .map(recommendation_groups)
        .unwrap_or_default();

    ExploreResult {
        talk: featured_talk(talk_record.as_ref(), request),
        summary: first_flat(&why, SUMMARY_KEYS).unwrap_or_default(),
        insight: first_flat(&why, INSIGHT_KEYS).unwrap_or_default(),
        recommendations,
    }
}

/// The explored talk. The url falls back to the requested url and the title
/// to one derived from the url slug.
fn featured_talk(raw: Option<&RawTalk>, request: &ExploreRequest) -> Option<TalkRef> {
    let url = raw
        .and_then(url)
        .or_else(|| request.url().map(ToOwned::to_owned))?;
    let title = raw
        .and_then(title)
        .or_else(|| title_from_url(&url))
        .unwrap_or_else(|| url.clone());

    Some(TalkRef {
        title,
        speaker: raw.and_then(speaker),
        url,
        thumbnail: raw
            .map(|raw| thumbnail(raw, FEATURED_PLACEHOLDER_THUMBNAIL))
            .unwrap_or_else(|| FEATURED_PLACEHOLDER_THUMBNAIL.to_string()),
    })
}

/// `https://ted.com/talks/dan_pink_the_puzzle_of_motivation` becomes
/// `Dan Pink The Puzzle Of Motivation`.
pub fn title_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let slug = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|slug| !slug.is_empty() && !slug.contains(':') && !slug.contains('.'))?;

    let words: Vec<String> = slug
        .split(['_', '-', '+'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn is_group(item: &Value) -> bool {
    item.as_object()
        .map(|map| {
            GROUP_ITEMS_KEYS
                .iter()
                .any(|key| map.get(*key).map(Value::is_array).unwrap_or(false))
        })
        .unwrap_or(false)
}

/// Walks `keys` inward until an array is found. A bare array is returned as
/// is.
fn list_items<'a>(payload: &'a Value, keys: &[&str]) -> &'a [Value] {
    match payload {
        Value::Array(items) => items,
        Value::Object(map) => keys
            .iter()
            .find_map(|key| map.get(*key).filter(|value| !value.is_null()))
            .map(|inner| list_items(inner, keys))
            .unwrap_or(&[]),
        _ => &[],
    }
}

fn flatten(text: &str) -> String {
    let decoded = decode_html_entities(text).into_owned();
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
