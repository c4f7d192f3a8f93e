//! Random Forest - bagged decision trees with probability averaging

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::classifier::{ClassProbabilities, Classifier};
use super::tree::{DecisionTree, TreeParams};
use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_RANDOM_SEED, DEFAULT_TREE_COUNT,
};
use crate::error::{CaptchaError, Result};
use crate::logic::session::Label;

/// Forest hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features considered per split; `None` means floor(sqrt(n_features))
    pub max_features: Option<usize>,
    /// Resample rows with replacement for each tree
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREE_COUNT,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            max_features: None,
            bootstrap: true,
            seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl ForestParams {
    fn tree_params(&self, n_features: usize) -> TreeParams {
        let max_features = self
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize)
            .clamp(1, n_features.max(1));

        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            n_features: 0,
            trees: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Impurity-based importances, summing to 1 (all zero if no tree split)
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Structural check for forests read from disk
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(CaptchaError::CorruptedModel("forest has no trees".to_string()));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(CaptchaError::CorruptedModel(format!(
                "{} importances for {} features",
                self.feature_importances.len(),
                self.n_features
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| CaptchaError::CorruptedModel(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, inputs: ArrayView2<'_, f64>, targets: &[Label]) -> Result<()> {
        let (n_samples, n_features) = inputs.dim();
        if n_samples == 0 {
            return Err(CaptchaError::EmptyDataset);
        }
        if targets.len() != n_samples {
            return Err(CaptchaError::InvalidConfig(format!(
                "{} input rows but {} targets",
                n_samples,
                targets.len()
            )));
        }

        // A NaN threshold would not survive a JSON round trip
        if let Some(((row, feature), _)) = inputs.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(CaptchaError::NonFiniteInput { row, feature });
        }

        let tree_params = self.params.tree_params(n_features);
        let mut master = StdRng::seed_from_u64(self.params.seed);
        let mut trees = Vec::with_capacity(self.params.n_trees);
        let mut importances = vec![0.0f64; n_features];

        for t in 0..self.params.n_trees {
            let mut rng = StdRng::seed_from_u64(master.gen());
            let sample: Vec<usize> = if self.params.bootstrap {
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
            } else {
                (0..n_samples).collect()
            };

            let mut tree_importances = vec![0.0f64; n_features];
            let tree = DecisionTree::fit(inputs, targets, sample, &tree_params, &mut rng, &mut tree_importances);
            log::debug!("Tree {}: {} nodes, depth {}", t, tree.node_count(), tree.depth());

            let total: f64 = tree_importances.iter().sum();
            if total > 0.0 {
                for (acc, v) in importances.iter_mut().zip(&tree_importances) {
                    *acc += v / total;
                }
            }
            trees.push(tree);
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        self.n_features = n_features;
        self.trees = trees;
        self.feature_importances = importances;
        Ok(())
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<ClassProbabilities> {
        if self.trees.is_empty() {
            return Err(CaptchaError::CorruptedModel("forest is not fitted".to_string()));
        }
        if row.len() != self.n_features {
            return Err(CaptchaError::InvalidConfig(format!(
                "row has {} features, forest expects {}",
                row.len(),
                self.n_features
            )));
        }

        if let Some(feature) = row.iter().position(|v| !v.is_finite()) {
            return Err(CaptchaError::NonFiniteInput { row: 0, feature });
        }

        let mut sum = [0.0f64; 2];
        for tree in &self.trees {
            let p = tree.predict_proba(row);
            sum[0] += p[0];
            sum[1] += p[1];
        }
        let n = self.trees.len() as f64;
        Ok(ClassProbabilities::from_array([sum[0] / n, sum[1] / n]))
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}
