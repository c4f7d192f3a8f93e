//! ROC-AUC as the Mann-Whitney rank statistic

/// AUC of `scores` against binary `positives`; ties get average ranks.
///
/// `None` unless both classes are present.
pub fn roc_auc(scores: &[f64], positives: &[bool]) -> Option<f64> {
    let n_pos = positives.iter().filter(|&&p| p).count();
    let n_neg = positives.len() - n_pos;
    if n_pos == 0 || n_neg == 0 || scores.len() != positives.len() {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0f64; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // ranks are 1-based; a tie block shares the mean of its ranks
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }

    let pos_rank_sum: f64 = ranks.iter().zip(positives).filter(|(_, p)| **p).map(|(r, _)| r).sum();
    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_ranking() {
        let auc = roc_auc(&[0.1, 0.2, 0.8, 0.9], &[false, false, true, true]);
        assert_eq!(auc, Some(1.0));
    }

    #[test]
    fn test_inverted_ranking() {
        let auc = roc_auc(&[0.9, 0.8, 0.2, 0.1], &[false, false, true, true]);
        assert_eq!(auc, Some(0.0));
    }

    #[test]
    fn test_all_tied() {
        let auc = roc_auc(&[0.5, 0.5, 0.5, 0.5], &[false, true, false, true]);
        assert_eq!(auc, Some(0.5));
    }

    #[test]
    fn test_partial_overlap() {
        // 3 of the 4 (positive, negative) pairs are ordered correctly
        let auc = roc_auc(&[0.1, 0.4, 0.35, 0.8], &[false, false, true, true]).unwrap();
        assert!((auc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_single_class() {
        assert_eq!(roc_auc(&[0.1, 0.9], &[true, true]), None);
        assert_eq!(roc_auc(&[], &[]), None);
    }
}
