//! Retail bank simulator.
//!
//! An in-memory model of a small bank driven by line-oriented operator
//! commands. Customers hold Savings, Student or Fixed Deposit accounts; staff
//! (Managing Director, Officers, Cashiers) act on them under a fixed
//! permission table; loans go through request and bulk approval; and a
//! year-end tick accrues interest, loan interest and service charges.
//!
//! # Layout
//!
//! - [`models`]: accounts, employees, loans, operation log entries
//! - [`services`]: the [`Bank`] aggregate and the interest pipeline
//! - [`handlers`]: the command dispatcher and reply rendering
//! - [`config`] / [`error`]: environment configuration and [`BankError`]

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::{Config, OutputFormat};
pub use error::{BankError, BankResult};
pub use handlers::Dispatcher;
pub use models::account::{Account, AccountKind};
pub use models::employee::{Employee, Permission, Role};
pub use models::loan::Loan;
pub use services::bank::{BalanceReport, Bank, YearEnd};
