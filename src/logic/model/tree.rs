//! CART decision tree (Gini impurity)
//!
//! Nodes live in a flat arena in pre-order, so every child index is
//! greater than its parent's.

use ndarray::{ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::logic::session::Label;

/// Minimum impurity decrease for a split to be kept
const MIN_GAIN: f64 = 1e-12;

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features drawn per node before settling for the best found
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Class fractions, indexed by `Label::index`
        distribution: [f64; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    /// Sample-weighted child impurity
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `sample` (duplicates allowed).
    ///
    /// Impurity decrease per feature is accumulated into `importances`.
    pub fn fit<R: Rng>(
        inputs: ArrayView2<'_, f64>,
        targets: &[Label],
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
        importances: &mut [f64],
    ) -> Self {
        let mut grower = Grower {
            inputs,
            targets,
            params,
            rng,
            importances,
            nodes: Vec::new(),
        };
        grower.grow(sample, 0);
        Self { nodes: grower.nodes }
    }

    /// Leaf distribution reached by `row`
    pub fn predict_proba(&self, row: ArrayView1<'_, f64>) -> [f64; 2] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { distribution } => return *distribution,
                Node::Split { feature, threshold, left, right } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Structural check for trees read from disk
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } => {
                    if distribution.iter().any(|p| !p.is_finite() || *p < 0.0) {
                        return Err(format!("node {} has an invalid distribution", id));
                    }
                }
                Node::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", id, feature, n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", id));
                    }
                    let in_range = |child: usize| child > id && child < self.nodes.len();
                    if !in_range(*left) || !in_range(*right) {
                        return Err(format!("node {} has out-of-order children", id));
                    }
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// GROWTH
// ============================================================================

struct Grower<'v, 'a, R> {
    inputs: ArrayView2<'v, f64>,
    targets: &'a [Label],
    params: &'a TreeParams,
    rng: &'a mut R,
    importances: &'a mut [f64],
    nodes: Vec<Node>,
}

impl<R: Rng> Grower<'_, '_, R> {
    fn grow(&mut self, sample: Vec<usize>, depth: usize) -> usize {
        let counts = class_counts(self.targets, &sample);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution: distribution(counts) });

        let pure = counts.iter().any(|&c| c == sample.len());
        if pure || depth >= self.params.max_depth || sample.len() < self.params.min_samples_split {
            return id;
        }

        let parent = sample.len() as f64 * gini(counts);
        let split = match self.best_split(&sample, counts) {
            Some(split) if split.impurity < parent - MIN_GAIN => split,
            _ => return id,
        };
        self.importances[split.feature] += parent - split.impurity;

        let (left, right): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| self.inputs[[i, split.feature]] <= split.threshold);

        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Visit features in random order; stop after `max_features` once any
    /// valid split has been found.
    fn best_split(&mut self, sample: &[usize], counts: [usize; 2]) -> Option<Split> {
        let mut features: Vec<usize> = (0..self.inputs.ncols()).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<Split> = None;
        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.params.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_split_on(feature, sample, counts) {
                if best.map_or(true, |b| candidate.impurity < b.impurity) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn best_split_on(&self, feature: usize, sample: &[usize], counts: [usize; 2]) -> Option<Split> {
        let mut column: Vec<(f64, usize)> = sample
            .iter()
            .map(|&i| (self.inputs[[i, feature]], self.targets[i].index()))
            .collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = column.len();
        let mut left = [0usize; 2];
        let mut best: Option<Split> = None;

        for k in 1..n {
            left[column[k - 1].1] += 1;
            let (lo, hi) = (column[k - 1].0, column[k].0);
            if hi <= lo {
                continue;
            }

            let right = [counts[0] - left[0], counts[1] - left[1]];
            let impurity = k as f64 * gini(left) + (n - k) as f64 * gini(right);
            if best.map_or(true, |b| impurity < b.impurity) {
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some(Split { feature, threshold, impurity });
            }
        }
        best
    }
}

fn class_counts(targets: &[Label], sample: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &i in sample {
        counts[targets[i].index()] += 1;
    }
    counts
}

fn distribution(counts: [usize; 2]) -> [f64; 2] {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return [0.5, 0.5];
    }
    [counts[0] as f64 / total, counts[1] as f64 / total]
}

fn gini(counts: [usize; 2]) -> f64 {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|&c| (c as f64 / total).powi(2)).sum::<f64>()
}
