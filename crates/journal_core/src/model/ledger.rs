//! Ledger (income/expense) record and monthly totals.

use crate::model::tags::EntryKind;
use crate::model::validation::{require_positive_amount, require_text, ValidationError};
use crate::model::Stored;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One income or expense movement.
///
/// `amount` is always positive; direction comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub day: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub kind: EntryKind,
}

impl LedgerEntry {
    pub fn new(
        day: NaiveDate,
        amount: f64,
        category: impl Into<String>,
        kind: EntryKind,
    ) -> Self {
        Self {
            day,
            amount,
            category: category.into(),
            description: None,
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Amount with the sign implied by `kind`.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive_amount(self.amount)?;
        require_text("category", &self.category)
    }
}

/// Income, expense and their difference over a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl LedgerTotals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Stored<LedgerEntry>>) -> Self {
        let (income, expense) =
            entries
                .into_iter()
                .fold((0.0, 0.0), |(income, expense), entry| match entry.kind {
                    EntryKind::Income => (income + entry.amount, expense),
                    EntryKind::Expense => (income, expense + entry.amount),
                });
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LedgerEntry, LedgerTotals};
    use crate::model::tags::EntryKind;
    use crate::model::validation::ValidationError;
    use crate::model::Stored;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn totals_subtract_expenses_from_income() {
        let entries = vec![
            Stored::new(1, LedgerEntry::new(day(), 100.0, "salary", EntryKind::Income)),
            Stored::new(2, LedgerEntry::new(day(), 30.0, "food", EntryKind::Expense)),
        ];
        let totals = LedgerTotals::from_entries(&entries);
        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 30.0);
        assert_eq!(totals.balance, 70.0);
    }

    #[test]
    fn empty_ledger_has_zero_totals() {
        let totals = LedgerTotals::from_entries(&[]);
        assert_eq!(totals, LedgerTotals::default());
    }

    #[test]
    fn signed_amount_follows_kind() {
        let expense = LedgerEntry::new(day(), 12.5, "transport", EntryKind::Expense);
        assert_eq!(expense.signed_amount(), -12.5);
    }

    #[test]
    fn validate_rejects_bad_amount_before_category() {
        let entry = LedgerEntry::new(day(), 0.0, "", EntryKind::Expense);
        assert_eq!(entry.validate(), Err(ValidationError::NonPositiveAmount));
    }
}
