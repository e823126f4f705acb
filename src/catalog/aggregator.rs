use crate::types::candidate::CatalogCandidate;
use tracing::debug;

/// Practical cap on merged candidates handed to the filter.
pub const DEFAULT_MAX_CANDIDATES: usize = 12;

/// Merges result lists from several phrasings of the same destination query.
///
/// Lists are concatenated in the order given and the first-seen candidate of
/// each duplicate group is kept, so the caller fixes the precedence, not the
/// order in which concurrent queries happened to finish.
#[derive(Debug, Clone)]
pub struct CandidateAggregator {
    max_candidates: usize,
}

impl Default for CandidateAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES)
    }
}

impl CandidateAggregator {
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    pub fn aggregate(&self, lists: &[Vec<CatalogCandidate>]) -> Vec<CatalogCandidate> {
        self.aggregate_iter(lists.iter().flatten())
    }

    pub fn aggregate_iter<'a, I>(&self, candidates: I) -> Vec<CatalogCandidate>
    where
        I: IntoIterator<Item = &'a CatalogCandidate>,
    {
        let mut kept: Vec<CatalogCandidate> = Vec::new();
        let mut kept_keys: Vec<DedupKey> = Vec::new();
        let mut seen = 0usize;

        for candidate in candidates {
            seen += 1;
            if kept.len() >= self.max_candidates {
                break;
            }

            let key = DedupKey::of(candidate);
            if key.name.is_empty() {
                continue;
            }
            if let Some(existing) = kept_keys.iter().position(|other| other.duplicates(&key)) {
                debug!(
                    target: "travel_extract::catalog",
                    dropped = %candidate.name,
                    kept = %kept[existing].name,
                    "duplicate candidate"
                );
                continue;
            }

            kept_keys.push(key);
            kept.push(candidate.clone());
        }

        debug!(
            target: "travel_extract::catalog",
            seen,
            kept = kept.len(),
            "aggregated candidates"
        );
        kept
    }
}

struct DedupKey {
    id: String,
    name: String,
}

impl DedupKey {
    fn of(candidate: &CatalogCandidate) -> Self {
        Self {
            id: candidate.id.trim().to_string(),
            name: candidate.name.trim().to_lowercase(),
        }
    }

    /// Same catalog id, same name, or one name contained in the other
    /// ("Tokyo Tower" vs "Tokyo Tower Observation Deck").
    fn duplicates(&self, other: &DedupKey) -> bool {
        if !self.id.is_empty() && self.id == other.id {
            return true;
        }
        self.name == other.name || self.name.contains(&other.name) || other.name.contains(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn candidate(id: &str, name: &str) -> CatalogCandidate {
        CatalogCandidate::new(id, name, "Landmark", "Tokyo, Japan")
    }

    fn names(candidates: &[CatalogCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_dedupes_by_id_name_and_substring() {
        let lists = vec![
            vec![candidate("1", "Tokyo Tower"), candidate("2", "Senso-ji")],
            vec![
                candidate("1", "Tokyo Tower (official)"),
                candidate("3", " senso-ji "),
                candidate("4", "Tokyo Tower Observation Deck"),
                candidate("5", "Meiji Shrine"),
            ],
        ];

        let merged = CandidateAggregator::default().aggregate(&lists);
        assert_eq!(names(&merged), vec!["Tokyo Tower", "Senso-ji", "Meiji Shrine"]);
    }

    #[test]
    fn test_shorter_later_name_is_dropped_too() {
        let lists = vec![vec![candidate("1", "Tokyo Skytree Observation Deck"), candidate("2", "Tokyo Skytree")]];
        let merged = CandidateAggregator::default().aggregate(&lists);
        assert_eq!(names(&merged), vec!["Tokyo Skytree Observation Deck"]);
    }

    #[test]
    fn test_cap_is_applied() {
        let list: Vec<CatalogCandidate> = (0..20)
            .map(|i| candidate(&i.to_string(), &format!("Place {:02}", i)))
            .collect();
        let merged = CandidateAggregator::new(12).aggregate(&[list]);
        assert_eq!(merged.len(), 12);
        assert_eq!(merged[11].name, "Place 11");
    }

    #[test]
    fn test_nameless_candidates_are_skipped() {
        let merged = CandidateAggregator::default().aggregate(&[vec![candidate("9", "  ")]]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let lists = vec![
            vec![candidate("1", "Tokyo Tower"), candidate("2", "Ueno Park")],
            vec![candidate("3", "Ueno Park Zoo"), candidate("4", "Imperial Palace")],
        ];
        let aggregator = CandidateAggregator::default();
        let once = aggregator.aggregate(&lists);
        let twice = aggregator.aggregate(&[once.clone()]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_list_order_does_not_change_the_set() {
        let a = vec![candidate("1", "Tokyo Tower"), candidate("2", "Senso-ji")];
        let b = vec![candidate("2", "Senso-ji"), candidate("3", "Meiji Shrine")];
        let c = vec![candidate("4", "Shibuya Crossing"), candidate("1", "Tokyo Tower")];

        let aggregator = CandidateAggregator::default();
        let orders = [
            vec![a.clone(), b.clone(), c.clone()],
            vec![a.clone(), c.clone(), b.clone()],
            vec![b.clone(), a.clone(), c.clone()],
            vec![b.clone(), c.clone(), a.clone()],
            vec![c.clone(), a.clone(), b.clone()],
            vec![c, b, a],
        ];

        let sets: Vec<BTreeSet<String>> = orders
            .iter()
            .map(|lists| {
                aggregator
                    .aggregate(lists)
                    .into_iter()
                    .map(|c| c.id)
                    .collect()
            })
            .collect();
        assert!(sets.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(sets[0].len(), 4);
    }
}
