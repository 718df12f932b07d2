//! Configuration document model and admin operations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;
use crate::feed::SubscribeFeed;

/// Wallpaper used when nothing has been stored yet
pub const DEFAULT_WALLPAPER: &str = "https://picsum.photos/1920/1080";

/// Category of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Mixed JSON configuration
    #[default]
    Mixed,
    /// Spider jar
    Spider,
    /// Live channel list (M3U)
    Live,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Mixed, SourceKind::Spider, SourceKind::Live];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Mixed => "mixed",
            SourceKind::Spider => "spider",
            SourceKind::Live => "live",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown source type '{0}' (expected mixed, spider or live)")]
pub struct ParseSourceKindError(String);

impl FromStr for SourceKind {
    type Err = ParseSourceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSourceKindError(s.to_string()))
    }
}

/// A named streaming source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub enabled: bool,
    /// Milliseconds since the Unix epoch
    pub updated_at: i64,
}

impl Source {
    /// The editable part of this record
    pub fn draft(&self) -> SourceDraft {
        SourceDraft {
            name: self.name.clone(),
            url: self.url.clone(),
            kind: self.kind,
            enabled: self.enabled,
        }
    }
}

/// The user-supplied fields of a source (everything but id and timestamp)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDraft {
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
    pub enabled: bool,
}

impl SourceDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind: SourceKind::default(),
            enabled: true,
        }
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Reject drafts whose name or URL is blank
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyField { field: "name" });
        }
        if self.url.trim().is_empty() {
            return Err(CoreError::EmptyField { field: "url" });
        }
        Ok(())
    }
}

/// Settings applied to the whole subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_wallpaper")]
    pub wallpaper: String,
    #[serde(default)]
    pub spider: String,
}

fn default_wallpaper() -> String {
    DEFAULT_WALLPAPER.to_string()
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            wallpaper: default_wallpaper(),
            spider: String::new(),
        }
    }
}

/// The persisted configuration document
///
/// Always read and written as a whole. Source order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl AppConfig {
    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Append a new source with a fresh id
    pub fn add_source(&mut self, draft: SourceDraft, now_ms: i64) -> Result<&Source, CoreError> {
        draft.validate()?;
        let index = self.sources.len();
        self.sources.push(Source {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            url: draft.url,
            kind: draft.kind,
            enabled: draft.enabled,
            updated_at: now_ms,
        });
        Ok(&self.sources[index])
    }

    /// Replace the editable fields of `id` in place
    ///
    /// Returns `Ok(None)` when no source has that id; the list is unchanged.
    pub fn update_source(
        &mut self,
        id: &str,
        draft: SourceDraft,
        now_ms: i64,
    ) -> Result<Option<&Source>, CoreError> {
        draft.validate()?;
        let Some(source) = self.sources.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        source.name = draft.name;
        source.url = draft.url;
        source.kind = draft.kind;
        source.enabled = draft.enabled;
        source.updated_at = now_ms;
        Ok(Some(&*source))
    }

    /// Remove `id`; returns false (and changes nothing) if it is absent
    pub fn remove_source(&mut self, id: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.id != id);
        self.sources.len() != before
    }

    /// Flip the enabled flag of `id`, returning the new value
    pub fn toggle_source(&mut self, id: &str) -> Option<bool> {
        let source = self.sources.iter_mut().find(|s| s.id == id)?;
        source.enabled = !source.enabled;
        Some(source.enabled)
    }

    pub fn subscribe_feed(&self) -> SubscribeFeed {
        SubscribeFeed::from_config(self)
    }
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
