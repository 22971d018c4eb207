//! Error types and operator-facing error reporting.
//!
//! This module defines every way a bank operation can be rejected and how
//! each rejection is identified when it is rendered back to the operator.

use rust_decimal::Decimal;

/// Application-wide error type.
///
/// Every variant is a recoverable, reported outcome. When a bank operation
/// returns `Err`, no part of the bank state has been modified.
///
/// # Error Categories
///
/// - **Lookup Errors**: unknown account holder or employee tag
/// - **Validation Errors**: malformed amounts, commands or account kinds
/// - **Business Rule Errors**: declined transactions, loan ceilings, fund shortfalls
/// - **Authorization Errors**: an employee role lacking the needed permission
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BankError {
    /// No account is registered under this holder name.
    #[error("Account not found for {0}")]
    AccountNotFound(String),

    /// Holder names are unique (case-insensitive).
    #[error("Account already exists for {0}")]
    AccountAlreadyExists(String),

    /// The account kind text did not name Savings, Student or Fixed Deposit.
    #[error("Invalid account type: {0}")]
    UnknownAccountKind(String),

    /// Opening deposit is below the minimum for the requested kind.
    #[error("Initial deposit must be at least {required}$, got {offered}$")]
    InitialDepositTooLow { required: Decimal, offered: Decimal },

    /// The account's own deposit or withdrawal rule refused the transaction.
    ///
    /// The String fields carry the holder and the operation name.
    #[error("Invalid transaction: {operation} declined for {holder}")]
    TransactionDeclined { holder: String, operation: String },

    /// Requested loan would push outstanding principal over the kind's ceiling.
    #[error(
        "Loan amount exceeds maximum loan amount: requested {requested}$, outstanding {outstanding}$, ceiling {ceiling}$"
    )]
    LoanCeilingExceeded {
        requested: Decimal,
        outstanding: Decimal,
        ceiling: Decimal,
    },

    /// The bank cannot commit funds it does not hold.
    #[error("Insufficient internal funds: requested {requested}$, available {available}$")]
    InsufficientInternalFunds { requested: Decimal, available: Decimal },

    /// The employee's role does not grant the operation.
    #[error("You don't have permission for this operation ({employee}: {operation})")]
    PermissionDenied { employee: String, operation: String },

    /// No employee is registered under this tag.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    /// The role text did not name a role that can be hired.
    #[error("Invalid employee type: {0}")]
    UnknownEmployeeRole(String),

    /// Amount was malformed, zero or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Unrecognized command or wrong argument count.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl BankError {
    /// Stable machine-readable code for this error.
    ///
    /// # Code Mapping
    ///
    /// - `AccountNotFound` / `EmployeeNotFound` → `*_not_found`
    /// - `TransactionDeclined` → `transaction_declined`
    /// - `PermissionDenied` → `permission_denied`
    /// - validation failures → `invalid_*`
    pub fn code(&self) -> &'static str {
        match self {
            BankError::AccountNotFound(_) => "account_not_found",
            BankError::AccountAlreadyExists(_) => "account_exists",
            BankError::UnknownAccountKind(_) => "invalid_account_kind",
            BankError::InitialDepositTooLow { .. } => "initial_deposit_too_low",
            BankError::TransactionDeclined { .. } => "transaction_declined",
            BankError::LoanCeilingExceeded { .. } => "loan_ceiling_exceeded",
            BankError::InsufficientInternalFunds { .. } => "insufficient_internal_funds",
            BankError::PermissionDenied { .. } => "permission_denied",
            BankError::EmployeeNotFound(_) => "employee_not_found",
            BankError::UnknownEmployeeRole(_) => "invalid_employee_role",
            BankError::InvalidAmount(_) => "invalid_amount",
            BankError::InvalidCommand(_) => "invalid_command",
        }
    }

    pub(crate) fn declined(holder: &str, operation: &str) -> Self {
        BankError::TransactionDeclined {
            holder: holder.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Arithmetic left the representable decimal range.
    pub(crate) fn overflow(operation: &str) -> Self {
        BankError::InvalidAmount(format!("{operation} is out of range"))
    }

    pub(crate) fn denied(employee: &str, operation: &str) -> Self {
        BankError::PermissionDenied {
            employee: employee.to_string(),
            operation: operation.to_string(),
        }
    }
}

/// Result alias used across the bank services.
pub type BankResult<T> = Result<T, BankError>;
