//! Public subscription feed
//!
//! The feed is what external players poll: the two global settings plus a
//! `{url, name}` pair for every enabled source, in document order.

use serde::{Deserialize, Serialize};

use crate::types::AppConfig;

/// One entry in the `urls` list of the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub url: String,
    pub name: String,
}

/// Denormalized payload served by `/subscribe`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeFeed {
    pub wallpaper: String,
    pub spider: String,
    pub urls: Vec<FeedEntry>,
}

impl SubscribeFeed {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            wallpaper: config.global_settings.wallpaper.clone(),
            spider: config.global_settings.spider.clone(),
            urls: config
                .sources
                .iter()
                .filter(|s| s.enabled)
                .map(|s| FeedEntry {
                    url: s.url.clone(),
                    name: s.name.clone(),
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON body (two-space indentation)
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
