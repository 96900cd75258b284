//! Stable textual rendering for text-only consumers (§4.3 phase 7).
//!
//! The raw `Vec<MemoryMatch>` remains available to agent callers; this is
//! only for rendering to a stable string for chat-style clients.

use crate::domain::{MatchSource, MemoryMatch};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Render matches grouped by source, with score annotations, in a stable
/// header-per-source textual structure.
#[must_use]
pub fn format_matches(matches: &[MemoryMatch]) -> String {
    if matches.is_empty() {
        return "No matches found.".to_string();
    }

    let mut grouped: BTreeMap<MatchSource, Vec<&MemoryMatch>> = BTreeMap::new();
    for m in matches {
        grouped.entry(m.source).or_default().push(m);
    }

    let mut out = String::new();
    for (source, items) in &grouped {
        let _ = writeln!(out, "## {source}");
        for item in items {
            match item.rerank_score {
                Some(rerank) => {
                    let _ = writeln!(
                        out,
                        "- [{:.3} (rerank {:.3})] {}",
                        item.score, rerank, item.content
                    );
                }
                None => {
                    let _ = writeln!(out, "- [{:.3}] {}", item.score, item.content);
                }
            }
        }
    }
    out.trim_end().to_string()
}

impl PartialOrd for MatchSource {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchSource {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn rank(s: &MatchSource) -> u8 {
            match s {
                MatchSource::Mem0 => 0,
                MatchSource::Vector => 1,
                MatchSource::Bm25 => 2,
                MatchSource::Graph => 3,
            }
        }
        rank(self).cmp(&rank(other))
    }
}
