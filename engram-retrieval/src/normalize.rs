//! Per-call min-max score normalization.

use std::collections::HashMap;

/// Normalize scores to [0, 1] in place. An empty map stays empty; a
/// constant map (max == min) normalizes to all 1.0 so a single source
/// can still clear the fused-score threshold.
pub fn min_max_normalize(scores: &mut HashMap<String, f64>) {
    if scores.is_empty() {
        return;
    }
    let min = scores.values().cloned().fold(f64::INFINITY, f64::min);
    let max = scores.values().cloned().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        for v in scores.values_mut() {
            *v = 1.0;
        }
        return;
    }
    for v in scores.values_mut() {
        *v = (*v - min) / (max - min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn spreads_scores_over_unit_interval() {
        let mut scores = map(&[("a", 2.0), ("b", 6.0), ("c", 4.0)]);
        min_max_normalize(&mut scores);
        assert_eq!(scores["a"], 0.0);
        assert_eq!(scores["b"], 1.0);
        assert_eq!(scores["c"], 0.5);
    }

    #[test]
    fn constant_scores_become_one() {
        let mut scores = map(&[("a", 3.3), ("b", 3.3)]);
        min_max_normalize(&mut scores);
        assert_eq!(scores["a"], 1.0);
        assert_eq!(scores["b"], 1.0);
    }

    #[test]
    fn single_entry_becomes_one() {
        let mut scores = map(&[("a", -7.25)]);
        min_max_normalize(&mut scores);
        assert_eq!(scores["a"], 1.0);
    }

    #[test]
    fn empty_stays_empty() {
        let mut scores: HashMap<String, f64> = HashMap::new();
        min_max_normalize(&mut scores);
        assert!(scores.is_empty());
    }
}
