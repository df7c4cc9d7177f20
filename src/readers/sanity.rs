//! Threshold rules and the whole-device sanity verdict
//!
//! A device is sane when every configured rule passes against the cached payload.
//! Labels without a rule always pass; the first failing rule decides the verdict.

use std::collections::HashMap;

use serde::Deserialize;

use crate::node_mgmt::de::lenient;

/// Tri-state validity of the most recent measurement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sanity {
    #[default]
    Unknown,
    Good,
    Bad,
}

impl Sanity {
    pub fn is_good(self) -> bool {
        self == Sanity::Good
    }

    pub fn is_bad(self) -> bool {
        self == Sanity::Bad
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ThresholdRule {
    #[serde(rename = "max")]
    Max {
        #[serde(deserialize_with = "lenient")]
        value: f64,
    },
    #[serde(rename = "min")]
    Min {
        #[serde(deserialize_with = "lenient")]
        value: f64,
    },
    /// Band whose edges count as violations: fails on `value <= low` or `value >= high`
    #[serde(rename = "pass")]
    PassBand {
        #[serde(rename = "valueMin", deserialize_with = "lenient")]
        low: f64,
        #[serde(rename = "valueMax", deserialize_with = "lenient")]
        high: f64,
    },
}

impl ThresholdRule {
    pub fn is_violated_by(&self, value: f64) -> bool {
        match *self {
            ThresholdRule::Max { value: bound } => value > bound,
            ThresholdRule::Min { value: bound } => value < bound,
            ThresholdRule::PassBand { low, high } => value >= high || value <= low,
        }
    }
}

/// Rules keyed by measurement label; one rule per label at most
pub type Thresholds = HashMap<String, ThresholdRule>;

/// Evaluate `thresholds` against `payload`, whose positions follow `labels`
///
/// A rule whose value is absent from the payload or does not parse as a number
/// counts as violated.
pub fn evaluate(labels: &[&str], payload: &[String], thresholds: &Thresholds) -> Sanity {
    for (position, label) in labels.iter().enumerate() {
        let Some(rule) = thresholds.get(*label) else {
            continue;
        };
        let value = payload
            .get(position)
            .and_then(|v| v.trim().parse::<f64>().ok());
        match value {
            Some(v) if !rule.is_violated_by(v) => {}
            Some(v) => {
                log::info!("Threshold {:?} violated by {} = {}", rule, label, v);
                return Sanity::Bad;
            }
            None => {
                log::warn!("No numeric value for thresholded label {}", label);
                return Sanity::Bad;
            }
        }
    }
    Sanity::Good
}
