//! Business logic services.
//!
//! Services own the bank state and enforce every cross-account rule:
//! internal funds, loan ceilings, interest rates and the year-end cycle.

pub mod bank;
pub mod interest;
