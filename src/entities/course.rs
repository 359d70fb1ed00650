//! Courses a profile can be enrolled in

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

impl Course {
    /// A course without an id, ready to be inserted
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

impl Entity for Course {
    fn resource_name() -> &'static str {
        "courses"
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
            _ => Vec::new(),
        }
    }
}
