//! Shared type definitions for the grouped-navigation pipeline.
//!
//! This crate holds the value objects passed between the admin-API client,
//! the grouping engine, the renderers, and the host synchronization layer:
//!
//! - Raw wire records as the admin API returns them ([`RawContentType`],
//!   [`Permission`]) with tolerant, defaulted deserialization
//! - The normalized [`ContentTypeDescriptor`] and derived
//!   [`ContentTypeGroup`] consumed by renderers
//! - Runtime configuration ([`RuntimeConfig`], [`NavConfig`],
//!   [`NavTemplate`])
//!
//! Everything here is plain data: no I/O, no host access.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;

pub use config::{DEFAULT_DELIMITER, NavConfig, NavTemplate, ParseNavTemplateError, RuntimeConfig};

/// Group name used when a descriptor carries no grouping prefix of its own
/// and as the pinned-first group in the final ordering.
pub const GENERAL_GROUP_NAME: &str = "General";

/// Added to the total item count to produce the sentinel sort order for
/// items without an explicit ordering hint. Keeps unordered items after
/// every hinted one regardless of listing size.
pub const SORT_ORDER_SENTINEL_OFFSET: i64 = 1000;

/// Whether a content type is list-like or a singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// Many entries per type (e.g. articles).
    #[serde(rename = "collectionType", alias = "collection")]
    Collection,
    /// Exactly one entry per type (e.g. a homepage).
    #[serde(rename = "singleType", alias = "single")]
    Single,
}

impl ContentKind {
    /// Path segment the host router uses for this kind.
    pub fn route_segment(&self) -> &'static str {
        match self {
            ContentKind::Collection => "collection-types",
            ContentKind::Single => "single-types",
        }
    }
}

/// Error returned when parsing a [`ContentKind`] from a string fails.
#[derive(Debug, Error)]
#[error("unknown content kind: {0}")]
pub struct ParseContentKindError(pub String);

impl FromStr for ContentKind {
    type Err = ParseContentKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "collectionType" | "collection" => Ok(ContentKind::Collection),
            "singleType" | "single" => Ok(ContentKind::Single),
            other => Err(ParseContentKindError(other.to_string())),
        }
    }
}

/// Display metadata nested inside a raw content-type record.
///
/// Every field is optional; the admin API is an unversioned contract and
/// older hosts omit pieces of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContentTypeInfo {
    /// Human-readable label, possibly carrying an ordering hint and a
    /// group prefix (e.g. `"[2] Blog | Post"`).
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    /// Singular form of the label, when the host provides one.
    #[serde(default, alias = "singularName")]
    pub singular_name: Option<String>,
}

/// A content-type record exactly as the admin listing endpoint returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawContentType {
    /// Namespaced unique identifier (e.g. `api::article.article`).
    pub uid: String,
    /// Short internal identifier; falls back to the uid tail when absent.
    #[serde(default, alias = "apiID", alias = "apiId")]
    pub api_id: Option<String>,
    /// List-like or singleton. Missing values default to collection at
    /// normalization time.
    #[serde(default)]
    pub kind: Option<ContentKind>,
    /// Nested display metadata; tolerated when entirely absent.
    #[serde(default)]
    pub info: RawContentTypeInfo,
    /// Whether the host reports the type as visible in its own navigation.
    #[serde(default, alias = "isDisplayed")]
    pub is_displayed: Option<bool>,
}

impl RawContentType {
    /// Tail segment of the uid, used as a best-effort label when display
    /// metadata is missing (`api::article.article` → `article`).
    pub fn uid_tail(&self) -> &str {
        self.uid.rsplit('.').next().unwrap_or(&self.uid)
    }
}

/// One permission pair from the permissions-for-current-user endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Namespaced action identifier (e.g.
    /// `plugin::content-manager.explorer.read`).
    pub action: String,
    /// Subject the action applies to, usually a content-type uid. The
    /// host emits `null` for subject-less actions.
    #[serde(default)]
    pub subject: Option<String>,
}

/// A normalized content-type descriptor, immutable once produced.
///
/// Produced by the normalizer from a [`RawContentType`]; every field is
/// fully resolved (hint stripped, group derived, href synthesized) so
/// downstream consumers never re-parse labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentTypeDescriptor {
    /// Globally unique identifier of the content type.
    pub uid: String,
    /// Short internal identifier.
    pub name: String,
    /// Label with the ordering hint stripped and the group prefix removed
    /// when it duplicated the group name.
    pub display_name: String,
    /// Derived group name; never empty.
    pub group: String,
    /// List-like or singleton.
    pub kind: ContentKind,
    /// Navigable path inside the host admin panel.
    pub href: String,
    /// Explicit ordering hint when the label carried one, otherwise the
    /// sentinel `total_count + SORT_ORDER_SENTINEL_OFFSET`.
    pub sort_order: i64,
}

/// A named cluster of descriptors, derived on every grouping pass and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentTypeGroup {
    /// Group key (first delimiter segment of the member labels).
    pub name: String,
    /// Members, unique by uid, in final render order.
    pub items: Vec<ContentTypeDescriptor>,
    /// Minimum sort order among members; drives inter-group ordering.
    pub sort_order: i64,
}

impl ContentTypeGroup {
    /// Whether the group holds exactly one item. Single-item groups render
    /// flat in the collapsible template.
    pub fn is_singleton(&self) -> bool {
        self.items.len() == 1
    }
}
