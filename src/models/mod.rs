//! Domain models for the bank simulation.
//!
//! This module contains the entities the bank owns and mutates.

/// Customer account model
pub mod account;
/// Staff roles and permissions
pub mod employee;
/// Pending loan request model
pub mod loan;
/// Audit log entries
pub mod operation;
