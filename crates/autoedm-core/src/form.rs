use serde::{Deserialize, Serialize};

use crate::category::CategoryId;
use crate::error::ValidationError;

/// Customer attributes collected by the form.
///
/// Empty strings stand for "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub customer_name: String,
    pub favorite_category: Option<CategoryId>,
    pub recent_purchase: String,
}

impl FormInput {
    pub fn new(
        customer_name: impl Into<String>,
        favorite_category: Option<CategoryId>,
        recent_purchase: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            favorite_category,
            recent_purchase: recent_purchase.into(),
        }
    }

    /// The name used in greetings and prompts, `there` when none was given.
    pub fn display_name(&self) -> &str {
        if self.customer_name.is_empty() {
            "there"
        } else {
            &self.customer_name
        }
    }

    pub fn validate(&self) -> Result<CategoryId, ValidationError> {
        self.favorite_category.ok_or(ValidationError::MissingCategory)
    }
}
