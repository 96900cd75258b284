//! The content-type registry (§4.2): an immutable set of built-in types
//! plus a mutable, persisted set of user-added ones.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use second_brain_core::domain::{ContentCategory, ContentTypeConfig};
use second_brain_core::error::{Error, Result};
use serde_json::json;
use std::collections::HashMap;

pub static BUILTIN_CONTENT_TYPES: Lazy<Vec<ContentTypeConfig>> = Lazy::new(|| {
    vec![
        ContentTypeConfig {
            slug: "blog_post".to_string(),
            display_name: "Blog Post".to_string(),
            category: ContentCategory::Content,
            is_builtin: true,
            description: "A long-form public blog post.".to_string(),
            writing_instructions: "Write in an engaging, narrative voice with a clear thesis.".to_string(),
            length_guidance: "800-1500 words".to_string(),
            ui_config: json!({"icon": "pencil"}),
        },
        ContentTypeConfig {
            slug: "social_post".to_string(),
            display_name: "Social Post".to_string(),
            category: ContentCategory::Content,
            is_builtin: true,
            description: "A short social media post.".to_string(),
            writing_instructions: "Be concise and hook the reader in the first line.".to_string(),
            length_guidance: "under 280 characters".to_string(),
            ui_config: json!({"icon": "megaphone"}),
        },
        ContentTypeConfig {
            slug: "fact".to_string(),
            display_name: "Fact".to_string(),
            category: ContentCategory::Knowledge,
            is_builtin: true,
            description: "A single, atomic piece of recalled knowledge.".to_string(),
            writing_instructions: "State the fact plainly with its source if known.".to_string(),
            length_guidance: "one or two sentences".to_string(),
            ui_config: json!({"icon": "book"}),
        },
        ContentTypeConfig {
            slug: "how_to".to_string(),
            display_name: "How-To".to_string(),
            category: ContentCategory::Knowledge,
            is_builtin: true,
            description: "A step-by-step procedural note.".to_string(),
            writing_instructions: "Use numbered steps, one action per step.".to_string(),
            length_guidance: "3-10 steps".to_string(),
            ui_config: json!({"icon": "list"}),
        },
        ContentTypeConfig {
            slug: "misc".to_string(),
            display_name: "Miscellaneous".to_string(),
            category: ContentCategory::Other,
            is_builtin: true,
            description: "Anything that doesn't fit another type.".to_string(),
            writing_instructions: "No fixed structure.".to_string(),
            length_guidance: "as needed".to_string(),
            ui_config: json!({"icon": "tag"}),
        },
    ]
});

/// The mutable, process-local user registry. A production deployment
/// persists this through the `SqlExecutor`; this in-memory guard is what
/// `SqlStorageService` wraps when no executor-backed table is configured.
#[derive(Default)]
pub struct UserContentTypeRegistry {
    types: Mutex<HashMap<String, ContentTypeConfig>>,
}

impl UserContentTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, config: ContentTypeConfig) -> Result<()> {
        if BUILTIN_CONTENT_TYPES.iter().any(|b| b.slug == config.slug) {
            return Err(Error::Conflict(format!("'{}' is a built-in content type", config.slug)));
        }
        self.types.lock().insert(config.slug.clone(), config);
        Ok(())
    }

    pub fn remove(&self, slug: &str) -> Result<()> {
        if BUILTIN_CONTENT_TYPES.iter().any(|b| b.slug == slug) {
            return Err(Error::Conflict(format!("'{slug}' is a built-in content type and cannot be removed")));
        }
        self.types
            .lock()
            .remove(slug)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("content type '{slug}' not found")))
    }

    #[must_use]
    pub fn list(&self) -> Vec<ContentTypeConfig> {
        let mut all: Vec<ContentTypeConfig> = BUILTIN_CONTENT_TYPES.clone();
        all.extend(self.types.lock().values().cloned());
        all
    }
}
