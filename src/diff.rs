//! Semantic diff engine.
//!
//! Compares two findings documents by embedding distance: a whole-document
//! distance for the overall change score, then a chunk-by-chunk pass that
//! classifies each aligned position as added, removed, or modified.
//!
//! Alignment is purely positional — chunk `i` of the old text is compared
//! with chunk `i` of the new text, with the shorter side padded by empty
//! strings. Content-similarity matching (e.g. bipartite assignment) would
//! align reordered sections better; switching to it would change reported
//! positions and is a behavior change, not a fix.
//!
//! The engine is stateless and never retries: oracle failures propagate to
//! the caller as hard errors.

use crate::chunk::segment;
use crate::embedding::{cosine_distance, EmbeddingProvider};
use crate::error::{LedgerError, Result};
use crate::models::{ChangeKind, ChangedSection, SemanticDiffResult};

/// Default sensitivity: aligned pairs with distance strictly above this are
/// reported as changed.
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// Maximum excerpt length, in characters, before truncation.
const EXCERPT_CHARS: usize = 100;

/// Cosine distance between two texts via the embedding provider.
///
/// Either text empty is the defined degenerate case and returns `2.0`
/// without consulting the provider. Otherwise both texts are embedded in
/// one batched call and the distance is `1 − cos(a, b)`: `0` = same
/// direction, `1` = orthogonal, `2` = opposite.
pub async fn distance(provider: &dyn EmbeddingProvider, a: &str, b: &str) -> Result<f64> {
    if a.is_empty() || b.is_empty() {
        return Ok(2.0);
    }

    let vectors = provider.embed(&[a.to_string(), b.to_string()]).await?;
    let [va, vb] = vectors.as_slice() else {
        return Err(LedgerError::Oracle(format!(
            "expected 2 embeddings, got {}",
            vectors.len()
        )));
    };

    if va.is_empty() || va.len() != vb.len() {
        return Err(LedgerError::Oracle(format!(
            "embedding dimension mismatch: {} vs {}",
            va.len(),
            vb.len()
        )));
    }

    Ok(cosine_distance(va, vb))
}

/// Compare two findings documents and classify changed sections.
///
/// Sections whose distance is strictly greater than `threshold` are
/// reported, in ascending position order: `added` when the old side is
/// empty, `removed` when the new side is empty, `modified` otherwise.
/// Distances and scores are rounded to 3 decimal places; excerpts carry the
/// first 100 characters of each side.
pub async fn semantic_diff(
    provider: &dyn EmbeddingProvider,
    old_text: &str,
    new_text: &str,
    threshold: f64,
    max_chunk_chars: usize,
) -> Result<SemanticDiffResult> {
    let overall_distance = distance(provider, old_text, new_text).await?;
    let overall_similarity = 1.0 - overall_distance;

    let old_chunks = segment(old_text, max_chunk_chars);
    let new_chunks = segment(new_text, max_chunk_chars);
    let total_sections = old_chunks.len().max(new_chunks.len());

    let mut sections = Vec::new();

    for i in 0..total_sections {
        let a = old_chunks.get(i).map(String::as_str).unwrap_or("");
        let b = new_chunks.get(i).map(String::as_str).unwrap_or("");

        let d = distance(provider, a, b).await?;
        if d <= threshold {
            continue;
        }

        let kind = if a.is_empty() {
            ChangeKind::Added
        } else if b.is_empty() {
            ChangeKind::Removed
        } else {
            ChangeKind::Modified
        };

        sections.push(ChangedSection {
            section: i as u32 + 1,
            kind,
            distance: round3(d),
            old_excerpt: excerpt(a),
            new_excerpt: excerpt(b),
        });
    }

    Ok(SemanticDiffResult {
        overall_similarity: round3(overall_similarity),
        change_score: round3(overall_distance),
        sections,
        total_sections,
    })
}

/// First 100 characters, `"..."`-suffixed when the text is longer.
fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_CHARS {
        let head: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const MOCK_DIMS: usize = 64;

    /// Deterministic oracle: every distinct text gets its own orthogonal
    /// unit vector, so identical texts have distance 0 and different texts
    /// have distance exactly 1.
    struct MockProvider {
        assigned: Mutex<HashMap<String, usize>>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                assigned: Mutex::new(HashMap::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for MockProvider {
        fn model_name(&self) -> &str {
            "mock"
        }

        fn dims(&self) -> usize {
            MOCK_DIMS
        }

        async fn embed(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut assigned = self.assigned.lock().unwrap();
            Ok(texts
                .iter()
                .map(|t| {
                    let next = assigned.len();
                    let axis = *assigned.entry(t.clone()).or_insert(next);
                    let mut v = vec![0.0f32; MOCK_DIMS];
                    v[axis % MOCK_DIMS] = 1.0;
                    v
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_distance_empty_sides_are_maximal() {
        let provider = MockProvider::new();
        assert_eq!(distance(&provider, "", "x").await.unwrap(), 2.0);
        assert_eq!(distance(&provider, "x", "").await.unwrap(), 2.0);
        assert_eq!(distance(&provider, "", "").await.unwrap(), 2.0);
        // Degenerate cases never reach the oracle.
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_distance_self_is_near_zero() {
        let provider = MockProvider::new();
        let d = distance(&provider, "same text", "same text").await.unwrap();
        assert!(d.abs() < 1e-6, "self-distance was {}", d);
    }

    #[tokio::test]
    async fn test_distance_symmetric() {
        let provider = MockProvider::new();
        let ab = distance(&provider, "alpha", "beta").await.unwrap();
        let ba = distance(&provider, "beta", "alpha").await.unwrap();
        assert_eq!(ab, ba);
    }

    #[tokio::test]
    async fn test_distance_dimension_mismatch_is_oracle_error() {
        struct Ragged;

        #[async_trait::async_trait]
        impl EmbeddingProvider for Ragged {
            fn model_name(&self) -> &str {
                "ragged"
            }
            fn dims(&self) -> usize {
                0
            }
            async fn embed(&self, _texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
                Ok(vec![vec![1.0, 0.0], vec![1.0]])
            }
        }

        let err = distance(&Ragged, "a", "b").await.unwrap_err();
        assert!(matches!(err, LedgerError::Oracle(_)));
    }

    #[tokio::test]
    async fn test_identical_documents_report_no_changes() {
        let provider = MockProvider::new();
        let result = semantic_diff(&provider, "Hello world", "Hello world", 0.15, 500)
            .await
            .unwrap();

        assert_eq!(result.overall_similarity, 1.0);
        assert_eq!(result.change_score, 0.0);
        assert_eq!(result.total_sections, 1);
        assert!(result.sections.is_empty());
    }

    #[tokio::test]
    async fn test_modified_paragraph_reported_at_its_position() {
        let provider = MockProvider::new();
        let result = semantic_diff(
            &provider,
            "Para one.\n\nPara two.",
            "Para one.\n\nPara three.",
            0.15,
            500,
        )
        .await
        .unwrap();

        assert_eq!(result.total_sections, 2);
        assert_eq!(result.sections.len(), 1);

        let section = &result.sections[0];
        assert_eq!(section.section, 2);
        assert_eq!(section.kind, ChangeKind::Modified);
        assert_eq!(section.distance, 1.0);
        assert_eq!(section.old_excerpt, "Para two.");
        assert_eq!(section.new_excerpt, "Para three.");
    }

    #[tokio::test]
    async fn test_threshold_boundary_is_strict() {
        // Orthogonal mock vectors make every differing pair distance
        // exactly 1.0; with threshold == 1.0 nothing may be reported.
        let provider = MockProvider::new();
        let result = semantic_diff(&provider, "one\n\ntwo", "uno\n\ndos", 1.0, 500)
            .await
            .unwrap();
        assert!(result.sections.is_empty());

        // Strictly below the pair distance, both positions are reported.
        let provider = MockProvider::new();
        let result = semantic_diff(&provider, "one\n\ntwo", "uno\n\ndos", 0.999, 500)
            .await
            .unwrap();
        assert_eq!(result.sections.len(), 2);
    }

    #[tokio::test]
    async fn test_extra_new_chunks_classify_as_added() {
        let provider = MockProvider::new();
        let result = semantic_diff(&provider, "alpha", "alpha\n\nbeta\n\ngamma", 0.15, 500)
            .await
            .unwrap();

        assert_eq!(result.total_sections, 3);
        let kinds: Vec<(u32, ChangeKind)> = result
            .sections
            .iter()
            .map(|s| (s.section, s.kind))
            .collect();
        assert_eq!(kinds, vec![(2, ChangeKind::Added), (3, ChangeKind::Added)]);
        assert_eq!(result.sections[0].old_excerpt, "");
        assert_eq!(result.sections[0].distance, 2.0);
    }

    #[tokio::test]
    async fn test_extra_old_chunks_classify_as_removed() {
        let provider = MockProvider::new();
        let result = semantic_diff(&provider, "alpha\n\nbeta\n\ngamma", "alpha", 0.15, 500)
            .await
            .unwrap();

        let kinds: Vec<(u32, ChangeKind)> = result
            .sections
            .iter()
            .map(|s| (s.section, s.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![(2, ChangeKind::Removed), (3, ChangeKind::Removed)]
        );
        assert_eq!(result.sections[1].new_excerpt, "");
    }

    #[tokio::test]
    async fn test_excerpts_truncate_at_100_chars() {
        let provider = MockProvider::new();
        let long_old = "x".repeat(150);
        let long_new = "y".repeat(99);
        let result = semantic_diff(&provider, &long_old, &long_new, 0.15, 500)
            .await
            .unwrap();

        let section = &result.sections[0];
        assert_eq!(section.old_excerpt.chars().count(), 103);
        assert!(section.old_excerpt.ends_with("..."));
        assert_eq!(section.new_excerpt, long_new);
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let provider = crate::embedding::DisabledProvider;
        let err = semantic_diff(&provider, "a", "b", 0.15, 500).await.unwrap_err();
        assert!(matches!(err, LedgerError::Oracle(_)));
    }

    #[tokio::test]
    async fn test_both_empty_documents() {
        let provider = MockProvider::new();
        let result = semantic_diff(&provider, "", "", 0.15, 500).await.unwrap();
        assert_eq!(result.total_sections, 0);
        assert!(result.sections.is_empty());
        assert_eq!(result.change_score, 2.0);
        assert_eq!(result.overall_similarity, -1.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.12345), 0.123);
        assert_eq!(round3(0.9996), 1.0);
        assert_eq!(round3(2.0), 2.0);
    }
}
