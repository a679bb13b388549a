use crate::taxonomy::Taxonomy;
use crate::types::AssignedLabels;
use indexmap::IndexMap;
use serde::Serialize;

/// Outcome tallies for one label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelTally {
    pub total: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub still_open: u64,
}

/// Outcome percentages for one label, rounded to two decimal places
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeShares {
    pub accepted_pct: f64,
    pub rejected_pct: f64,
    pub still_open_pct: f64,
}

/// Per-label outcome counts for one batch run. Owned by the batch
/// orchestrator; records feed it via `update` after classification.
#[derive(Debug, Clone, Default)]
pub struct AggregateCounts {
    counts: IndexMap<String, LabelTally>,
}

impl AggregateCounts {
    /// Zeroed counts for every label in the taxonomy, fallback included,
    /// so the summary always lists the full table in declared order
    pub fn new(taxonomy: &Taxonomy) -> Self {
        let counts = taxonomy
            .label_names()
            .into_iter()
            .map(|name| (name.to_string(), LabelTally::default()))
            .collect();
        Self { counts }
    }

    /// Tally one record's labels against its outcome. Every involved label
    /// gains a total; exactly one outcome bucket is incremented for records
    /// in a recognized state, and none for an unknown state.
    pub fn update(&mut self, labels: &AssignedLabels, state: &str, merged: Option<bool>) {
        for label in labels.names() {
            let tally = self.counts.entry(label.to_string()).or_default();
            tally.total += 1;
            match (state, merged) {
                ("closed", Some(true)) => tally.accepted += 1,
                ("closed", Some(false)) => tally.rejected += 1,
                ("open", _) => tally.still_open += 1,
                _ => {}
            }
        }
    }

    /// Per-label outcome percentages; a zero-total label yields zeros
    pub fn finalize(&self) -> IndexMap<String, OutcomeShares> {
        self.counts
            .iter()
            .map(|(label, tally)| {
                let shares = if tally.total == 0 {
                    OutcomeShares::default()
                } else {
                    let total = tally.total as f64;
                    OutcomeShares {
                        accepted_pct: round2(tally.accepted as f64 / total * 100.0),
                        rejected_pct: round2(tally.rejected as f64 / total * 100.0),
                        still_open_pct: round2(tally.still_open as f64 / total * 100.0),
                    }
                };
                (label.clone(), shares)
            })
            .collect()
    }

    pub fn get(&self, label: &str) -> Option<&LabelTally> {
        self.counts.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LabelTally)> {
        self.counts.iter()
    }
}

/// Rescale every label's percentages so the cross-label sum is exactly 100.
/// Optional post-process: under the multi-label policy a record contributes
/// to several labels' totals, which is why the raw sum can exceed 100.
pub fn rescale(shares: &mut IndexMap<String, OutcomeShares>) {
    let sum: f64 = shares
        .values()
        .map(|s| s.accepted_pct + s.rejected_pct + s.still_open_pct)
        .sum();

    if sum == 0.0 {
        return;
    }

    let factor = 100.0 / sum;
    for share in shares.values_mut() {
        share.accepted_pct = round2(share.accepted_pct * factor);
        share.rejected_pct = round2(share.rejected_pct * factor);
        share.still_open_pct = round2(share.still_open_pct * factor);
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{LabelRule, PriorityTier};

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(
            vec![
                LabelRule::new("A", PriorityTier::Standard, &["a"]),
                LabelRule::new("B", PriorityTier::Standard, &["b"]),
            ],
            "Other",
        )
    }

    fn multi(labels: &[&str]) -> AssignedLabels {
        AssignedLabels::Multi(labels.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_update_buckets() {
        let mut counts = AggregateCounts::new(&taxonomy());
        counts.update(&multi(&["A"]), "closed", Some(true));
        counts.update(&multi(&["A"]), "closed", Some(false));
        counts.update(&multi(&["A", "B"]), "open", None);

        let a = counts.get("A").unwrap();
        assert_eq!(a.total, 3);
        assert_eq!(a.accepted, 1);
        assert_eq!(a.rejected, 1);
        assert_eq!(a.still_open, 1);

        let b = counts.get("B").unwrap();
        assert_eq!(b.total, 1);
        assert_eq!(b.still_open, 1);
    }

    #[test]
    fn test_unknown_state_counts_total_only() {
        let mut counts = AggregateCounts::new(&taxonomy());
        counts.update(&multi(&["A"]), "", None);
        counts.update(&multi(&["A"]), "merged", Some(true));

        let a = counts.get("A").unwrap();
        assert_eq!(a.total, 2);
        assert_eq!(a.accepted + a.rejected + a.still_open, 0);
    }

    #[test]
    fn test_single_label_updates() {
        let mut counts = AggregateCounts::new(&taxonomy());
        counts.update(
            &AssignedLabels::Single("Other".to_string()),
            "closed",
            Some(true),
        );
        assert_eq!(counts.get("Other").unwrap().accepted, 1);
    }

    #[test]
    fn test_finalize_percentages() {
        let mut counts = AggregateCounts::new(&taxonomy());
        counts.update(&multi(&["A"]), "closed", Some(true));
        counts.update(&multi(&["A"]), "closed", Some(true));
        counts.update(&multi(&["A"]), "open", None);

        let shares = counts.finalize();
        let a = &shares["A"];
        assert_eq!(a.accepted_pct, 66.67);
        assert_eq!(a.rejected_pct, 0.0);
        assert_eq!(a.still_open_pct, 33.33);
    }

    #[test]
    fn test_finalize_zero_total_is_defined() {
        let counts = AggregateCounts::new(&taxonomy());
        let shares = counts.finalize();
        assert_eq!(shares["A"], OutcomeShares::default());
        assert_eq!(shares["Other"], OutcomeShares::default());
    }

    #[test]
    fn test_preserves_taxonomy_order() {
        let counts = AggregateCounts::new(&taxonomy());
        let shares = counts.finalize();
        let labels: Vec<&String> = shares.keys().collect();
        assert_eq!(labels, ["A", "B", "Other"]);
    }

    #[test]
    fn test_rescale_sums_to_one_hundred() {
        let mut counts = AggregateCounts::new(&taxonomy());
        // One record contributes to both labels, so raw percentages sum to 200
        counts.update(&multi(&["A", "B"]), "closed", Some(true));

        let mut shares = counts.finalize();
        rescale(&mut shares);

        let sum: f64 = shares
            .values()
            .map(|s| s.accepted_pct + s.rejected_pct + s.still_open_pct)
            .sum();
        assert!((sum - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_rescale_all_zero_is_noop() {
        let mut shares = AggregateCounts::new(&taxonomy()).finalize();
        rescale(&mut shares);
        assert_eq!(shares["A"], OutcomeShares::default());
    }
}
