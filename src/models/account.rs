//! Customer account model and per-kind transaction rules.
//!
//! This module defines:
//! - `AccountKind`: the three account products the bank offers
//! - `AccountVariant`: kind tag plus any per-kind policy state
//! - `Account`: a customer account with balance and outstanding loan

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::{BankError, BankResult};

/// Savings withdrawals must leave at least this much in the account.
pub const SAVINGS_MIN_BALANCE: Decimal = dec!(1000);

/// Largest single withdrawal a student account allows.
pub const STUDENT_MAX_WITHDRAWAL: Decimal = dec!(1000);

/// Minimum opening deposit for a fixed deposit account.
pub const FIXED_DEPOSIT_MIN_OPENING: Decimal = dec!(100000);

/// Minimum size of any later deposit into a fixed deposit account.
pub const FIXED_DEPOSIT_MIN_TOP_UP: Decimal = dec!(50000);

/// Account product offered by the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Savings,
    Student,
    FixedDeposit,
}

impl AccountKind {
    pub const ALL: [AccountKind; 3] = [
        AccountKind::Savings,
        AccountKind::Student,
        AccountKind::FixedDeposit,
    ];

    /// Maximum outstanding loan principal for this kind.
    pub fn max_loan(self) -> Decimal {
        match self {
            AccountKind::Savings => dec!(10000),
            AccountKind::Student => dec!(1000),
            AccountKind::FixedDeposit => dec!(100000),
        }
    }

    /// Yearly interest rate (as a fraction) a new bank starts with.
    pub fn default_interest_rate(self) -> Decimal {
        match self {
            AccountKind::Savings => dec!(0.10),
            AccountKind::Student => dec!(0.05),
            AccountKind::FixedDeposit => dec!(0.15),
        }
    }

    /// Smallest deposit accepted when opening an account of this kind.
    pub fn min_opening_deposit(self) -> Decimal {
        match self {
            AccountKind::FixedDeposit => FIXED_DEPOSIT_MIN_OPENING,
            AccountKind::Savings | AccountKind::Student => Decimal::ZERO,
        }
    }

    /// Student accounts are exempt from the yearly service charge.
    pub fn pays_service_charge(self) -> bool {
        !matches!(self, AccountKind::Student)
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountKind::Savings => "Savings",
            AccountKind::Student => "Student",
            AccountKind::FixedDeposit => "Fixed Deposit",
        };
        f.write_str(name)
    }
}

/// Parses kind names case-insensitively.
///
/// Accepts `savings`, `student`, and `fixed deposit` in any of the spellings
/// `fixed`, `fd`, `fixeddeposit`, `fixed_deposit`, `fixed-deposit`.
impl FromStr for AccountKind {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        match normalized.as_str() {
            "savings" => Ok(AccountKind::Savings),
            "student" => Ok(AccountKind::Student),
            "fixeddeposit" | "fixed" | "fd" => Ok(AccountKind::FixedDeposit),
            _ => Err(BankError::UnknownAccountKind(s.trim().to_string())),
        }
    }
}

/// Kind tag plus the policy state that only one kind carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountVariant {
    Savings,
    Student,
    /// `matured` gates withdrawals and is refreshed at every year-end.
    FixedDeposit { matured: bool },
}

impl AccountVariant {
    fn for_kind(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Savings => AccountVariant::Savings,
            AccountKind::Student => AccountVariant::Student,
            AccountKind::FixedDeposit => AccountVariant::FixedDeposit { matured: true },
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            AccountVariant::Savings => AccountKind::Savings,
            AccountVariant::Student => AccountKind::Student,
            AccountVariant::FixedDeposit { .. } => AccountKind::FixedDeposit,
        }
    }
}

/// A customer account held in the bank.
///
/// # Identity
///
/// `holder` keeps the name as first typed; the bank indexes accounts by the
/// lower-cased holder name.
///
/// # Invariants
///
/// - `loan_amount` is never negative
/// - deposits and withdrawals that break the variant's rule leave `balance` untouched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    holder: String,
    balance: Decimal,
    loan_amount: Decimal,
    #[serde(flatten)]
    variant: AccountVariant,
}

impl Account {
    /// Open an account, enforcing the kind's minimum opening deposit.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: opening deposit is negative
    /// - `InitialDepositTooLow`: fixed deposit opened with less than 100,000
    pub fn open(holder: &str, kind: AccountKind, initial_deposit: Decimal) -> BankResult<Self> {
        if initial_deposit < Decimal::ZERO {
            return Err(BankError::InvalidAmount(format!(
                "initial deposit cannot be negative: {initial_deposit}"
            )));
        }

        let required = kind.min_opening_deposit();
        if initial_deposit < required {
            return Err(BankError::InitialDepositTooLow {
                required,
                offered: initial_deposit,
            });
        }

        Ok(Self {
            holder: holder.to_string(),
            balance: initial_deposit,
            loan_amount: Decimal::ZERO,
            variant: AccountVariant::for_kind(kind),
        })
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn loan_amount(&self) -> Decimal {
        self.loan_amount
    }

    pub fn kind(&self) -> AccountKind {
        self.variant.kind()
    }

    pub fn variant(&self) -> &AccountVariant {
        &self.variant
    }

    pub fn max_loan(&self) -> Decimal {
        self.kind().max_loan()
    }

    /// Whether a fixed deposit account may currently be withdrawn from.
    /// Always `false` for the other kinds, which have no maturity gate.
    pub fn is_mature(&self) -> bool {
        matches!(self.variant, AccountVariant::FixedDeposit { matured: true })
    }

    /// Apply the variant's deposit rule.
    ///
    /// Returns `Ok(false)` and leaves the balance unchanged when the rule
    /// declines.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: the new balance would be out of range
    pub fn deposit(&mut self, amount: Decimal) -> BankResult<bool> {
        let accepted = match self.variant {
            AccountVariant::Savings | AccountVariant::Student => true,
            AccountVariant::FixedDeposit { .. } => amount >= FIXED_DEPOSIT_MIN_TOP_UP,
        };
        if !accepted {
            return Ok(false);
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::overflow("deposit"))?;
        Ok(true)
    }

    /// Apply the variant's withdrawal rule.
    ///
    /// Returns `Ok(false)` and leaves the balance unchanged when the rule
    /// declines.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: the remaining balance would be out of range
    pub fn withdraw(&mut self, amount: Decimal) -> BankResult<bool> {
        let remaining = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| BankError::overflow("withdrawal"))?;
        let accepted = match self.variant {
            AccountVariant::Savings => remaining >= SAVINGS_MIN_BALANCE,
            AccountVariant::Student => {
                amount <= STUDENT_MAX_WITHDRAWAL && remaining >= Decimal::ZERO
            }
            AccountVariant::FixedDeposit { matured } => matured && remaining >= Decimal::ZERO,
        };

        if accepted {
            self.balance = remaining;
        }
        Ok(accepted)
    }

    /// Whether `amount` more principal stays within the loan ceiling.
    pub fn can_borrow(&self, amount: Decimal) -> bool {
        self.loan_amount
            .checked_add(amount)
            .is_some_and(|total| total <= self.max_loan())
    }

    /// Disburse an approved loan into the account. Both balance and loan
    /// amount change, or neither does.
    pub(crate) fn disburse_loan(&mut self, amount: Decimal) -> BankResult<()> {
        let loan_amount = self
            .loan_amount
            .checked_add(amount)
            .ok_or_else(|| BankError::overflow("loan amount"))?;
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::overflow("loan disbursement"))?;

        self.loan_amount = loan_amount;
        self.balance = balance;
        Ok(())
    }

    pub(crate) fn credit(&mut self, amount: Decimal) -> BankResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::overflow("interest credit"))?;
        Ok(())
    }

    /// Debit a charge, flooring the balance at zero. Whatever the balance
    /// cannot cover is added to the outstanding loan. Returns that shortfall.
    pub(crate) fn charge(&mut self, amount: Decimal) -> BankResult<Decimal> {
        if self.balance >= amount {
            self.balance -= amount;
            return Ok(Decimal::ZERO);
        }

        let shortfall = amount - self.balance;
        self.loan_amount = self
            .loan_amount
            .checked_add(shortfall)
            .ok_or_else(|| BankError::overflow("loan amount"))?;
        self.balance = Decimal::ZERO;
        Ok(shortfall)
    }

    /// Mark a fixed deposit account as mature. No effect on other kinds.
    pub(crate) fn mature(&mut self) {
        if let AccountVariant::FixedDeposit { matured } = &mut self.variant {
            *matured = true;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_matured(&mut self, value: bool) {
        if let AccountVariant::FixedDeposit { matured } = &mut self.variant {
            *matured = value;
        }
    }
}
