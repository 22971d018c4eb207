//! Pending loan request model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use uuid::Uuid;

/// Yearly interest charged on outstanding loan principal.
pub const LOAN_INTEREST_RATE: Decimal = dec!(0.10);

/// A loan request waiting for approval.
///
/// The bank keeps at most one of these per account holder; a newer
/// request from the same holder replaces the older one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    /// Unique identifier for this request
    pub id: Uuid,

    /// Holder name as it was given on the request
    pub holder: String,

    /// Principal requested
    pub amount: Decimal,

    /// When the request was filed
    pub requested_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(holder: &str, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            holder: holder.to_string(),
            amount,
            requested_at: Utc::now(),
        }
    }

    /// Interest this principal accrues over one year.
    pub fn interest(&self) -> Decimal {
        self.amount * LOAN_INTEREST_RATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_interest() {
        let loan = Loan::new("Bob", dec!(50000));
        assert_eq!(loan.interest(), dec!(5000));
        assert_eq!(loan.holder, "Bob");
    }

    #[test]
    fn test_loan_ids_are_unique() {
        let a = Loan::new("Bob", dec!(1));
        let b = Loan::new("Bob", dec!(1));
        assert_ne!(a.id, b.id);
    }
}
