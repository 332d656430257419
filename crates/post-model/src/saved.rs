//! References to saved posts owned by the external persistence layer.
//!
//! The core never creates, lists or deletes saved posts. It only hands a
//! materialized `PostContent` plus a thumbnail to a store and receives an
//! identifier back.

use serde::{Deserialize, Serialize};

/// Publication state of a saved post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("Unknown status: {other}. Use: draft, published")),
        }
    }
}

/// Opaque identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Saved-post record as returned by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPost {
    pub id: PostId,
    pub title: String,
    pub status: PostStatus,
    /// Pointer to the stored content document.
    pub content_ref: String,
    /// URL of the uploaded thumbnail bitmap.
    pub thumbnail_ref: Option<String>,
    /// Last update timestamp (RFC 3339), when the store tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_post_document_shape() {
        let saved = SavedPost {
            id: PostId("p-1".to_string()),
            title: "Friday".to_string(),
            status: PostStatus::Published,
            content_ref: "posts/p-1.json".to_string(),
            thumbnail_ref: None,
            updated_at: None,
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["id"], "p-1");
        assert_eq!(json["status"], "published");
        assert_eq!(json["contentRef"], "posts/p-1.json");
    }
}
