//! Stratified train / validation split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::logic::session::Label;

/// Row indices on each side of the split, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Hold out `ratio` of each class, keeping at least one row per class for
/// training. Same labels + ratio + seed always give the same split.
pub fn stratified_split(labels: &[Label], ratio: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut validation = Vec::new();

    for class in Label::ALL {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == class)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);

        let held = ((members.len() as f64 * ratio).round() as usize).min(members.len() - 1);
        validation.extend_from_slice(&members[..held]);
        train.extend_from_slice(&members[held..]);
    }

    train.sort_unstable();
    validation.sort_unstable();
    Split { train, validation }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(humans: usize, bots: usize) -> Vec<Label> {
        std::iter::repeat(Label::Human)
            .take(humans)
            .chain(std::iter::repeat(Label::Bot).take(bots))
            .collect()
    }

    #[test]
    fn test_split_is_stratified() {
        let labels = labels(50, 50);
        let split = stratified_split(&labels, 0.3, 42);

        assert_eq!(split.validation.len(), 30);
        assert_eq!(split.train.len(), 70);
        let held_bots = split.validation.iter().filter(|&&i| labels[i] == Label::Bot).count();
        assert_eq!(held_bots, 15);
    }

    #[test]
    fn test_split_is_a_partition() {
        let labels = labels(7, 4);
        let split = stratified_split(&labels, 0.4, 1);

        let mut all: Vec<usize> = split.train.iter().chain(&split.validation).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_keeps_one_training_row_per_class() {
        let labels = labels(1, 1);
        let split = stratified_split(&labels, 0.9, 1);
        assert_eq!(split.train, vec![0, 1]);
        assert!(split.validation.is_empty());
    }

    #[test]
    fn test_zero_ratio_holds_nothing_out() {
        let labels = labels(5, 5);
        let split = stratified_split(&labels, 0.0, 1);
        assert!(split.validation.is_empty());
        assert_eq!(split.train.len(), 10);
    }

    #[test]
    fn test_split_deterministic() {
        let labels = labels(20, 20);
        assert_eq!(stratified_split(&labels, 0.3, 9), stratified_split(&labels, 0.3, 9));
    }
}
