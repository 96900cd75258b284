//! Pure content-type registry logic: grouping by category (§4.2). The
//! built-in/user registries themselves live in `second-brain-storage`,
//! which is the crate that owns persistence; this module only has the
//! deterministic grouping function so it can be unit-tested without a
//! storage backend.

use crate::domain::ContentTypeConfig;
use std::collections::BTreeMap;

/// Group content types by category in the fixed order spec'd in §4.2:
/// content categories first, then knowledge categories, then "other";
/// within each category, slugs sorted alphabetically.
#[must_use]
pub fn group_content_types_by_category(types: &[ContentTypeConfig]) -> Vec<(String, Vec<String>)> {
    let mut by_category: BTreeMap<u8, (String, Vec<String>)> = BTreeMap::new();

    for t in types {
        let rank = t.category.sort_rank();
        let label = match t.category {
            crate::domain::ContentCategory::Content => "content",
            crate::domain::ContentCategory::Knowledge => "knowledge",
            crate::domain::ContentCategory::Other => "other",
        };
        let entry = by_category
            .entry(rank)
            .or_insert_with(|| (label.to_string(), Vec::new()));
        entry.1.push(t.slug.clone());
    }

    for (_, slugs) in by_category.values_mut() {
        slugs.sort();
    }

    by_category.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentCategory;
    use serde_json::json;

    fn ct(slug: &str, category: ContentCategory) -> ContentTypeConfig {
        ContentTypeConfig {
            slug: slug.to_string(),
            display_name: slug.to_string(),
            category,
            is_builtin: true,
            description: String::new(),
            writing_instructions: String::new(),
            length_guidance: String::new(),
            ui_config: json!({}),
        }
    }

    #[test]
    fn orders_content_before_knowledge_before_other() {
        let types = vec![
            ct("misc", ContentCategory::Other),
            ct("fact", ContentCategory::Knowledge),
            ct("blog_post", ContentCategory::Content),
        ];
        let grouped = group_content_types_by_category(&types);
        let labels: Vec<_> = grouped.iter().map(|(c, _)| c.clone()).collect();
        assert_eq!(labels, vec!["content", "knowledge", "other"]);
    }

    #[test]
    fn sorts_slugs_alphabetically_within_category() {
        let types = vec![
            ct("zeta", ContentCategory::Content),
            ct("alpha", ContentCategory::Content),
        ];
        let grouped = group_content_types_by_category(&types);
        assert_eq!(grouped[0].1, vec!["alpha".to_string(), "zeta".to_string()]);
    }
}
