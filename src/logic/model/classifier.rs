//! Classifier contract
//!
//! Anything that can `fit` on labeled rows and report class probabilities
//! for one row can stand in for the forest.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logic::session::Label;

/// Probability per class; the two fields sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub human: f64,
    pub bot: f64,
}

impl ClassProbabilities {
    pub fn from_array(values: [f64; 2]) -> Self {
        Self {
            human: values[Label::Human.index()],
            bot: values[Label::Bot.index()],
        }
    }

    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Human => self.human,
            Label::Bot => self.bot,
        }
    }

    /// Most probable class. An exact tie goes to HUMAN.
    pub fn label(&self) -> Label {
        if self.bot > self.human {
            Label::Bot
        } else {
            Label::Human
        }
    }

    /// Probability of the most probable class
    pub fn confidence(&self) -> f64 {
        self.get(self.label())
    }
}

/// Trait for binary HUMAN/BOT classifiers
pub trait Classifier {
    /// Fit on `inputs` (one row per sample) against `targets`
    fn fit(&mut self, inputs: ArrayView2<'_, f64>, targets: &[Label]) -> Result<()>;

    /// Class probabilities for a single row
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<ClassProbabilities>;

    fn is_fitted(&self) -> bool;
}
