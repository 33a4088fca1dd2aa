//! Validators for parameter types this crate does not know about.

use std::collections::HashMap;

use crate::types::ParameterDefinition;
use crate::value::{FormValue, FormValues};

/// Validation for one custom parameter type.
///
/// Returns a user-facing message, or `None` when the value is acceptable.
pub trait FieldValidator: Send + Sync {
    fn validate(
        &self,
        definition: &ParameterDefinition,
        value: Option<&FormValue>,
        values: &FormValues,
    ) -> Option<String>;
}

impl<F> FieldValidator for F
where
    F: Fn(&ParameterDefinition, Option<&FormValue>, &FormValues) -> Option<String> + Send + Sync,
{
    fn validate(
        &self,
        definition: &ParameterDefinition,
        value: Option<&FormValue>,
        values: &FormValues,
    ) -> Option<String> {
        self(definition, value, values)
    }
}

/// Custom validators keyed by parameter type tag.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Box<dyn FieldValidator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` for the type tag `tag`, replacing any previous one.
    pub fn register(mut self, tag: impl Into<String>, validator: impl FieldValidator + 'static) -> Self {
        self.validators.insert(tag.into(), Box::new(validator));
        self
    }

    pub fn get(&self, tag: &str) -> Option<&dyn FieldValidator> {
        self.validators.get(tag).map(|v| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("tags", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
