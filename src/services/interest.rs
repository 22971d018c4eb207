//! Interest rate table and the year-end accrual pipeline.
//!
//! # Pipeline Order
//!
//! For each account, once per simulated year:
//!
//! 1. Credit `balance * rate[kind]`
//! 2. Debit loan interest `loan_amount * 10%`
//! 3. Debit the 500 service charge (not for student accounts)
//! 4. Mark fixed deposit accounts mature
//!
//! Steps 2 and 3 floor the balance at zero and move any shortfall onto the
//! outstanding loan. Reordering the steps changes the numbers.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::{BankError, BankResult};
use crate::models::account::{Account, AccountKind};
use crate::models::loan::LOAN_INTEREST_RATE;

/// Flat yearly fee for every non-student account.
pub const SERVICE_CHARGE: Decimal = dec!(500);

/// Yearly interest rates by account kind, stored as fractions (0.10 = 10%).
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRates {
    rates: HashMap<AccountKind, Decimal>,
}

impl Default for InterestRates {
    fn default() -> Self {
        let rates = AccountKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.default_interest_rate()))
            .collect();
        Self { rates }
    }
}

impl InterestRates {
    pub fn get(&self, kind: AccountKind) -> Decimal {
        self.rates
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_interest_rate())
    }

    /// Set a kind's rate from a percentage (`12.5` stores `0.125`).
    ///
    /// Returns the stored fraction.
    pub fn set_percent(&mut self, kind: AccountKind, percent: Decimal) -> BankResult<Decimal> {
        if percent < Decimal::ZERO {
            return Err(BankError::InvalidAmount(format!(
                "interest rate cannot be negative: {percent}"
            )));
        }

        let fraction = percent / dec!(100);
        self.rates.insert(kind, fraction);
        Ok(fraction)
    }
}

/// What one year-end pass did to one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accrual {
    pub holder: String,
    pub interest: Decimal,
    pub loan_interest: Decimal,
    pub service_charge: Decimal,
    /// Part of the loan interest and service charge added to the loan
    /// because the balance could not cover it
    pub added_to_loan: Decimal,
    pub balance: Decimal,
    pub loan_amount: Decimal,
}

/// Run the year-end pipeline on a single account.
///
/// # Errors
///
/// - `InvalidAmount`: a step overflowed the decimal range. The account may
///   be partly updated, so callers run this on a working copy.
pub fn accrue(account: &mut Account, rates: &InterestRates) -> BankResult<Accrual> {
    let kind = account.kind();

    let interest = account
        .balance()
        .checked_mul(rates.get(kind))
        .ok_or_else(|| BankError::overflow("interest"))?;
    account.credit(interest)?;

    let loan_interest = account
        .loan_amount()
        .checked_mul(LOAN_INTEREST_RATE)
        .ok_or_else(|| BankError::overflow("loan interest"))?;
    let mut added_to_loan = account.charge(loan_interest)?;

    let service_charge = if kind.pays_service_charge() {
        added_to_loan += account.charge(SERVICE_CHARGE)?;
        SERVICE_CHARGE
    } else {
        Decimal::ZERO
    };

    if kind == AccountKind::FixedDeposit {
        account.mature();
    }

    Ok(Accrual {
        holder: account.holder().to_string(),
        interest,
        loan_interest,
        service_charge,
        added_to_loan,
        balance: account.balance(),
        loan_amount: account.loan_amount(),
    })
}
