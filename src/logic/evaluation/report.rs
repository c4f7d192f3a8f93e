//! Evaluation report types

use serde::{Deserialize, Serialize};

use crate::logic::session::Label;

/// 2×2 counts indexed `[actual][predicted]` by `Label::index`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn record(&mut self, actual: Label, predicted: Label) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|&l| self.get(l, l)).sum()
    }

    /// Correct counts, HUMAN then BOT
    pub fn diagonal(&self) -> [usize; 2] {
        [self.get(Label::Human, Label::Human), self.get(Label::Bot, Label::Bot)]
    }

    /// Misclassified counts: HUMAN→BOT then BOT→HUMAN
    pub fn off_diagonal(&self) -> [usize; 2] {
        [self.get(Label::Human, Label::Bot), self.get(Label::Bot, Label::Human)]
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Share of predictions of `label` that were right (0 if never predicted)
    pub fn precision(&self, label: Label) -> f64 {
        let predicted = Label::ALL.iter().map(|&a| self.get(a, label)).sum();
        ratio(self.get(label, label), predicted)
    }

    /// Share of actual `label` sessions that were found (0 if none present)
    pub fn recall(&self, label: Label) -> f64 {
        let actual = Label::ALL.iter().map(|&p| self.get(label, p)).sum();
        ratio(self.get(label, label), actual)
    }

    pub fn support(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Per-class precision / recall / F1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    pub fn from_matrix(matrix: &ConfusionMatrix, label: Label) -> Self {
        let precision = matrix.precision(label);
        let recall = matrix.recall(label);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
            support: matrix.support(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub accuracy: f64,
    pub human: ClassMetrics,
    pub bot: ClassMetrics,
    pub confusion_matrix: ConfusionMatrix,
    /// Area under ROC of the BOT probability; `None` with a single class
    pub roc_auc: Option<f64>,
}

impl EvaluationReport {
    pub fn class(&self, label: Label) -> &ClassMetrics {
        match label {
            Label::Human => &self.human,
            Label::Bot => &self.bot,
        }
    }

    pub fn precision(&self, label: Label) -> f64 {
        self.class(label).precision
    }

    pub fn recall(&self, label: Label) -> f64 {
        self.class(label).recall
    }
}
