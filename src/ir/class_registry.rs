//! Ordered class list with a stable name-to-id mapping.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use crate::error::Voc2YoloError;

/// Classes of the PCB defect dataset, in class-id order.
pub const DEFAULT_CLASSES: [&str; 6] = [
    "missing_hole",
    "mouse_bite",
    "open_circuit",
    "short",
    "spur",
    "spurious_copper",
];

/// Immutable registry of recognized class names.
///
/// The position of a name in the list is its YOLO class id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRegistry {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ClassRegistry {
    /// Builds a registry, rejecting empty or duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self, Voc2YoloError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(Voc2YoloError::InvalidClassRegistry(
                "at least one class name is required".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (id, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Voc2YoloError::InvalidClassRegistry(format!(
                    "class {id} has an empty name"
                )));
            }
            if let Some(first) = index.insert(name.clone(), id) {
                return Err(Voc2YoloError::InvalidClassRegistry(format!(
                    "duplicate class name '{name}' (ids {first} and {id})"
                )));
            }
        }

        Ok(Self { names, index })
    }

    /// Class id for `name`, or `None` if the class is not recognized.
    pub fn class_id(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSES).expect("default class list is valid")
    }
}

impl<'de> Deserialize<'de> for ClassRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        ClassRegistry::new(names).map_err(serde::de::Error::custom)
    }
}
