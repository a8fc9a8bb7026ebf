//! Input validation shared by the page services.
//!
//! The store accepts any well-typed record; these checks run before a write
//! is issued so rejected input never reaches storage.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    EmptyText { field: &'static str },
    /// Ledger amount is zero or negative.
    NonPositiveAmount,
    /// Ledger amount is NaN or infinite.
    NonFiniteAmount,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText { field } => write!(f, "{field} cannot be empty"),
            Self::NonPositiveAmount => write!(f, "amount must be greater than zero"),
            Self::NonFiniteAmount => write!(f, "amount must be a finite number"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyText { field });
    }
    Ok(())
}

pub(crate) fn require_positive_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount);
    }
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}
