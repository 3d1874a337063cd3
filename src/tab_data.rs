/// Data structures for Oasis tab groups
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a saved tab group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

/// Stable identifier of a tab record inside a group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub String);

impl GroupId {
    pub fn generate() -> Self {
        GroupId(Uuid::new_v4().to_string())
    }
}

impl TabId {
    pub fn generate() -> Self {
        TabId(Uuid::new_v4().to_string())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::generate()
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// When a group was captured.
///
/// Written as an ISO-8601 string; epoch milliseconds are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapturedAt {
    Millis(f64),
    Iso(String),
}

impl CapturedAt {
    /// Build a timestamp from host epoch milliseconds
    pub fn from_millis(millis: f64) -> Self {
        match DateTime::from_timestamp_millis(millis as i64) {
            Some(dt) => CapturedAt::Iso(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => CapturedAt::Millis(millis),
        }
    }

    /// Epoch milliseconds, if the stored value can be interpreted as a time
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            CapturedAt::Millis(ms) if ms.is_finite() => Some(*ms as i64),
            CapturedAt::Millis(_) => None,
            CapturedAt::Iso(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.timestamp_millis()),
        }
    }
}

impl fmt::Display for CapturedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapturedAt::Millis(ms) => write!(f, "{}", ms),
            CapturedAt::Iso(s) => f.write_str(s),
        }
    }
}

/// A tab as reported by the host browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostTab {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub index: i32,
}

impl HostTab {
    pub fn new(id: i32, url: &str, title: &str, index: i32) -> HostTab {
        HostTab {
            id,
            url: Some(url.to_string()),
            title: title.to_string(),
            index,
        }
    }
}

/// A saved tab within a group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabRecord {
    #[serde(default)]
    pub id: TabId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TabRecord {
    pub fn from_host(tab: &HostTab) -> TabRecord {
        TabRecord {
            id: TabId::generate(),
            title: tab.title.clone(),
            url: tab.url.clone(),
        }
    }

    /// The url to reopen, if the record has a usable one
    pub fn restorable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// A snapshot of a window's tabs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabGroup {
    #[serde(default)]
    pub id: GroupId,
    /// Absent in hand-written or older lists
    #[serde(rename = "capturedAt", default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<CapturedAt>,
    pub tabs: Vec<TabRecord>,
}

impl TabGroup {
    pub fn capture(tabs: &[HostTab], captured_at: CapturedAt) -> TabGroup {
        TabGroup {
            id: GroupId::generate(),
            captured_at: Some(captured_at),
            tabs: tabs.iter().map(TabRecord::from_host).collect(),
        }
    }
}

/// Addresses a group or a tab either by position or by stable id
#[derive(Debug, Clone, PartialEq)]
pub enum Locator<Id> {
    At(usize),
    Id(Id),
}

impl<Id> From<usize> for Locator<Id> {
    fn from(index: usize) -> Self {
        Locator::At(index)
    }
}

impl From<GroupId> for Locator<GroupId> {
    fn from(id: GroupId) -> Self {
        Locator::Id(id)
    }
}

impl From<&GroupId> for Locator<GroupId> {
    fn from(id: &GroupId) -> Self {
        Locator::Id(id.clone())
    }
}

impl From<TabId> for Locator<TabId> {
    fn from(id: TabId) -> Self {
        Locator::Id(id)
    }
}

impl From<&TabId> for Locator<TabId> {
    fn from(id: &TabId) -> Self {
        Locator::Id(id.clone())
    }
}
