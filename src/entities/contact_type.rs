//! Channels a phone number can be reached on

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactType {
    pub id: i64,
    pub reference_name: String,
    pub display_name: String,
    pub description: Option<String>,
}

impl ContactType {
    pub fn new(
        reference_name: impl Into<String>,
        display_name: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            reference_name: reference_name.into(),
            display_name: display_name.into(),
            description,
        }
    }
}

impl Entity for ContactType {
    fn resource_name() -> &'static str {
        "contact-types"
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
            "reference_name" => vec![FieldValue::String(self.reference_name.clone())],
            "display_name" => vec![FieldValue::String(self.display_name.clone())],
            _ => Vec::new(),
        }
    }
}
