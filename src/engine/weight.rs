use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::category::Category;

/// The classification data a resolver may look at. Both fields are already
/// loaded before ranking starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classification<'a> {
    pub category: Option<&'a Category>,
    pub type_label: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    Category,
    TypeTable,
}

impl WeightPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightPolicy::Category => "category",
            WeightPolicy::TypeTable => "type_table",
        }
    }
}

impl fmt::Display for WeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(WeightPolicy::Category),
            "type_table" | "type" => Ok(WeightPolicy::TypeTable),
            other => Err(format!(
                "unknown weight policy {other:?} (expected category or type_table)"
            )),
        }
    }
}

pub trait WeightResolver: Send + Sync {
    fn policy(&self) -> WeightPolicy;

    /// `None` means the classification could not be resolved.
    fn resolve(&self, classification: &Classification<'_>) -> Option<f64>;
}

/// Reads the weight (`bobot`) configured on the linked category.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryWeight;

impl WeightResolver for CategoryWeight {
    fn policy(&self) -> WeightPolicy {
        WeightPolicy::Category
    }

    fn resolve(&self, classification: &Classification<'_>) -> Option<f64> {
        classification.category.map(|category| category.bobot)
    }
}

/// Static label to weight table, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct TypeWeightTable {
    weights: HashMap<String, f64>,
}

impl TypeWeightTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let weights = entries
            .into_iter()
            .map(|(label, weight)| (normalize_label(label.as_ref()), weight))
            .collect();

        Self { weights }
    }
}

impl Default for TypeWeightTable {
    fn default() -> Self {
        Self::new(default_type_weights())
    }
}

impl WeightResolver for TypeWeightTable {
    fn policy(&self) -> WeightPolicy {
        WeightPolicy::TypeTable
    }

    fn resolve(&self, classification: &Classification<'_>) -> Option<f64> {
        let label = classification.type_label?;
        self.weights.get(&normalize_label(label)).copied()
    }
}

pub fn default_type_weights() -> Vec<(String, f64)> {
    vec![
        ("complaint".to_string(), 1.0),
        ("service".to_string(), 0.6),
        ("information".to_string(), 0.4),
    ]
}

/// Parses `label=weight` pairs separated by commas, e.g.
/// `complaint=1.0,service=0.6`. Every weight must lie in [0, 1].
pub fn parse_type_weights(raw: &str) -> Result<Vec<(String, f64)>, String> {
    let mut entries = Vec::new();

    for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
        let (label, weight) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected label=weight, got {pair:?}"))?;

        let label = label.trim();
        if label.is_empty() {
            return Err(format!("empty label in {pair:?}"));
        }

        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|err| format!("invalid weight for {label:?}: {err}"))?;

        if !(0.0..=1.0).contains(&weight) {
            return Err(format!("weight for {label:?} must be within [0, 1], got {weight}"));
        }

        entries.push((label.to_string(), weight));
    }

    if entries.is_empty() {
        return Err("no type weights given".to_string());
    }

    Ok(entries)
}

pub fn build_resolver(
    policy: WeightPolicy,
    type_weights: &[(String, f64)],
) -> Box<dyn WeightResolver> {
    match policy {
        WeightPolicy::Category => Box::new(CategoryWeight),
        WeightPolicy::TypeTable => Box::new(TypeWeightTable::new(
            type_weights.iter().map(|(label, weight)| (label.as_str(), *weight)),
        )),
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
