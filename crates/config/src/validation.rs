//! Range and presence checks shared by the config sections

use std::fmt::Display;
use std::ops::RangeInclusive;

pub use crate::error::ValidationError;

/// A `[section]` of the config file
pub trait ConfigSection: Default {
    /// Every problem in the section, or `Ok` when all values are usable
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

/// Collects the problems of one section
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn within<T>(mut self, field: &'static str, value: T, allowed: RangeInclusive<T>) -> Self
    where
        T: PartialOrd + Display,
    {
        if !allowed.contains(&value) {
            self.errors.push(ValidationError::with_value(
                field,
                format!("must be between {} and {}", allowed.start(), allowed.end()),
                value,
            ));
        }
        self
    }

    pub fn filled(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::new(field, "must not be empty"));
        }
        self
    }

    pub fn finish(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
