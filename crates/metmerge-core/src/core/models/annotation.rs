use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cross-reference annotation entry: either one identifier or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Scalar(String),
    List(Vec<String>),
}

impl AnnotationValue {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            AnnotationValue::Scalar(value) => std::slice::from_ref(value),
            AnnotationValue::List(values) => values.as_slice(),
        };
        slice.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values().all(str::is_empty)
    }

    /// Appends every value of `other` not already present, collapsing back to
    /// a scalar when only one value remains.
    pub fn merge_unique(&mut self, other: &AnnotationValue) {
        let mut merged: Vec<String> = self.values().map(str::to_string).collect();
        for value in other.values() {
            if !merged.iter().any(|existing| existing == value) {
                merged.push(value.to_string());
            }
        }
        *self = if merged.len() == 1 {
            AnnotationValue::Scalar(merged.remove(0))
        } else {
            AnnotationValue::List(merged)
        };
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Scalar(value.to_string())
    }
}

/// Namespace-keyed cross-reference metadata attached to a model entity.
pub type Annotations = IndexMap<String, AnnotationValue>;

/// Folds `source` into `target`, de-duplicating values key by key.
pub fn merge_annotations(target: &mut Annotations, source: &Annotations) {
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) if existing.is_empty() => *existing = value.clone(),
            Some(existing) => {
                if existing != value {
                    existing.merge_unique(value);
                }
            }
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merges `value` into the entry under `key`, creating it when missing.
pub fn merge_annotation_value(target: &mut Annotations, key: &str, value: AnnotationValue) {
    match target.get_mut(key) {
        Some(existing) if !existing.is_empty() => existing.merge_unique(&value),
        Some(existing) => *existing = value,
        None => {
            target.insert(key.to_string(), value);
        }
    }
}
