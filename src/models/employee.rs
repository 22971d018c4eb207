//! Bank staff and the role permission table.
//!
//! Employees never touch account data themselves. Each operation checks the
//! role's permission and then forwards to the bank, or returns
//! `PermissionDenied` without changing anything.
//!
//! | Role              | lookup | approve loan | change rate | see internal fund |
//! |-------------------|--------|--------------|-------------|-------------------|
//! | Managing Director | yes    | yes          | yes         | yes               |
//! | Officer           | yes    | yes          | no          | no                |
//! | Cashier           | yes    | no           | no          | no                |

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{BankError, BankResult};
use crate::models::account::AccountKind;
use crate::models::loan::Loan;
use crate::services::bank::{BalanceReport, Bank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ManagingDirector,
    Officer,
    Cashier,
}

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Lookup,
    ApproveLoan,
    ChangeInterestRate,
    SeeInternalFund,
}

impl Permission {
    pub fn name(self) -> &'static str {
        match self {
            Permission::Lookup => "lookup",
            Permission::ApproveLoan => "approve loan",
            Permission::ChangeInterestRate => "change interest rate",
            Permission::SeeInternalFund => "see internal fund",
        }
    }
}

impl Role {
    pub fn permits(self, permission: Permission) -> bool {
        match self {
            Role::ManagingDirector => true,
            Role::Officer => matches!(permission, Permission::Lookup | Permission::ApproveLoan),
            Role::Cashier => matches!(permission, Permission::Lookup),
        }
    }

    /// Prefix of this role's employee tags (`MD`, `O1`, `C3`).
    pub fn tag_prefix(self) -> &'static str {
        match self {
            Role::ManagingDirector => "MD",
            Role::Officer => "O",
            Role::Cashier => "C",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::ManagingDirector => "Managing Director",
            Role::Officer => "Officer",
            Role::Cashier => "Cashier",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "managing director" | "managingdirector" => Ok(Role::ManagingDirector),
            "o" | "officer" => Ok(Role::Officer),
            "c" | "cashier" => Ok(Role::Cashier),
            _ => Err(BankError::UnknownEmployeeRole(s.trim().to_string())),
        }
    }
}

/// A member of staff, identified by a role-tagged name such as `O1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    tag: String,
    role: Role,
}

impl Employee {
    pub fn new(tag: &str, role: Role) -> Self {
        Self {
            tag: tag.to_uppercase(),
            role,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Check the role table, logging denials.
    pub fn authorize(&self, permission: Permission) -> BankResult<()> {
        if self.role.permits(permission) {
            Ok(())
        } else {
            tracing::warn!(
                employee = %self.tag,
                operation = permission.name(),
                "permission denied"
            );
            Err(BankError::denied(&self.tag, permission.name()))
        }
    }

    pub fn lookup(&self, holder: &str, bank: &Bank) -> BankResult<BalanceReport> {
        self.authorize(Permission::Lookup)?;
        bank.lookup(holder)
    }

    /// Approve every pending loan request at once.
    pub fn approve_loan(&self, bank: &mut Bank) -> BankResult<Vec<Loan>> {
        self.authorize(Permission::ApproveLoan)?;
        bank.approve_loans()
    }

    /// Set a kind's yearly rate from a percentage. Returns the stored fraction.
    pub fn change_interest_rate(
        &self,
        kind: AccountKind,
        percent: Decimal,
        bank: &mut Bank,
    ) -> BankResult<Decimal> {
        self.authorize(Permission::ChangeInterestRate)?;
        bank.change_interest_rate(kind, percent)
    }

    pub fn see_internal_fund(&self, bank: &Bank) -> BankResult<Decimal> {
        self.authorize(Permission::SeeInternalFund)?;
        Ok(bank.see_internal_fund())
    }
}
