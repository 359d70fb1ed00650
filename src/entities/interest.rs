//! Interest tags

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub id: i64,
    pub name: String,

    /// Stable machine-readable name, e.g. `"backend"`
    pub reference_name: String,
}

impl Interest {
    pub fn new(name: impl Into<String>, reference_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            reference_name: reference_name.into(),
        }
    }
}

impl Entity for Interest {
    fn resource_name() -> &'static str {
        "interests"
    }

    fn unique_id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn field_values(&self, field: &str) -> Vec<FieldValue> {
        match field {
            "id" => vec![FieldValue::Integer(self.id)],
            "name" => vec![FieldValue::String(self.name.clone())],
            "reference_name" => vec![FieldValue::String(self.reference_name.clone())],
            _ => Vec::new(),
        }
    }
}
