/// Graph filter descriptions stored in the filter history.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which graph items a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Nodes,
    Edges,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Nodes => write!(f, "nodes"),
            ItemType::Edges => write!(f, "edges"),
        }
    }
}

/// One filtering step applied to the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum GraphFilter {
    /// Keeps items whose numeric `field` lies in `[min, max]`. A missing
    /// bound is open.
    Range {
        item_type: ItemType,
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default)]
        keep_missing_values: bool,
    },
    /// Keeps items whose `field` value is one of `terms`.
    Terms {
        item_type: ItemType,
        field: String,
        #[serde(default)]
        terms: BTreeSet<String>,
        #[serde(default)]
        keep_missing_values: bool,
    },
}

impl GraphFilter {
    pub fn range(item_type: ItemType, field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        GraphFilter::Range {
            item_type,
            field: field.to_string(),
            min,
            max,
            keep_missing_values: false,
        }
    }

    pub fn terms<I, S>(item_type: ItemType, field: &str, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GraphFilter::Terms {
            item_type,
            field: field.to_string(),
            terms: terms.into_iter().map(Into::into).collect(),
            keep_missing_values: false,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            GraphFilter::Range { item_type, .. } | GraphFilter::Terms { item_type, .. } => {
                *item_type
            }
        }
    }

    pub fn field(&self) -> &str {
        match self {
            GraphFilter::Range { field, .. } | GraphFilter::Terms { field, .. } => field,
        }
    }

    /// One-line summary for history listings.
    pub fn describe(&self) -> String {
        match self {
            GraphFilter::Range { min, max, .. } => {
                let bound = |b: &Option<f64>| b.map_or_else(|| "*".to_string(), |v| v.to_string());
                format!(
                    "{} {} in [{}, {}]",
                    self.item_type(),
                    self.field(),
                    bound(min),
                    bound(max)
                )
            }
            GraphFilter::Terms { terms, .. } => {
                let listed: Vec<&str> = terms.iter().map(String::as_str).collect();
                format!(
                    "{} {} in {{{}}}",
                    self.item_type(),
                    self.field(),
                    listed.join(", ")
                )
            }
        }
    }
}
