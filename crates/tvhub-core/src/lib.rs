//! tvhub-core: Shared types and storage for tvhub
//!
//! This crate provides the configuration document model, the public
//! subscription feed reshape, and the key-value storage backends used by the
//! tvhub server and admin client.

pub mod document;
pub mod error;
pub mod feed;
pub mod store;
pub mod types;

pub use error::{CoreError, StoreError};
pub use feed::{FeedEntry, SubscribeFeed};
pub use store::{CONFIG_KEY, KvStore, MemoryStore, SharedStore, SqliteStore};
pub use types::{AppConfig, GlobalSettings, Source, SourceDraft, SourceKind, now_millis};
