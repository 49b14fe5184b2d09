//! Search hit re-ranking

use std::collections::HashSet;

use tabrag_core::SearchHit;

/// Deduplicate hits by exact text, keeping the first occurrence in input
/// order, then sort by score descending and keep the best `limit`.
///
/// The store's own ordering is deliberately not trusted; this function is
/// the single place the final context order is decided.
pub fn rank(hits: Vec<SearchHit>, limit: usize) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    let mut unique: Vec<SearchHit> = hits
        .into_iter()
        .filter(|hit| seen.insert(hit.payload.text.clone()))
        .collect();

    unique.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    unique.truncate(limit);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tabrag_core::RecordPayload;

    fn hit(text: &str, score: f32) -> SearchHit {
        SearchHit {
            id: format!("id-{}-{}", text, score),
            score,
            payload: RecordPayload {
                source_file: "reviews.csv".to_string(),
                row_index: 0,
                text: text.to_string(),
                timestamp: Utc::now(),
            },
        }
    }

    fn texts_and_scores(hits: &[SearchHit]) -> Vec<(String, f32)> {
        hits.iter()
            .map(|h| (h.payload.text.clone(), h.score))
            .collect()
    }

    #[test]
    fn removes_duplicate_texts_keeping_first_occurrence() {
        let ranked = rank(vec![hit("a", 0.9), hit("a", 0.5), hit("b", 0.8)], 5);

        assert_eq!(
            texts_and_scores(&ranked),
            vec![("a".to_string(), 0.9), ("b".to_string(), 0.8)]
        );
    }

    #[test]
    fn first_occurrence_wins_even_with_lower_score() {
        let ranked = rank(vec![hit("a", 0.5), hit("a", 0.9), hit("b", 0.8)], 5);

        assert_eq!(
            texts_and_scores(&ranked),
            vec![("b".to_string(), 0.8), ("a".to_string(), 0.5)]
        );
    }

    #[test]
    fn sorts_by_score_descending() {
        let ranked = rank(vec![hit("c", 0.2), hit("a", 0.9), hit("b", 0.8)], 5);

        let scores: Vec<f32> = ranked.iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![0.9, 0.8, 0.2]);
    }

    #[test]
    fn truncates_to_the_limit() {
        let hits: Vec<SearchHit> = (0..8)
            .map(|i| hit(&format!("row {}", i), i as f32 / 10.0))
            .collect();

        let ranked = rank(hits, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].score, 0.7);
    }

    #[test]
    fn ranking_is_idempotent() {
        let input = vec![hit("a", 0.9), hit("a", 0.5), hit("b", 0.8), hit("c", 0.1)];

        let once = rank(input, 5);
        let twice = rank(once.clone(), 5);

        assert_eq!(texts_and_scores(&once), texts_and_scores(&twice));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(rank(Vec::new(), 5).is_empty());
    }
}
