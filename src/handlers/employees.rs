//! Employee session commands.
//!
//! - `lookup <holder>`
//! - `approve loan`
//! - `change <kind> <rate%>`
//! - `see`
//! - `close`
//!
//! Every command goes through the employee's role check first.

use std::str::FromStr;

use crate::error::BankError;
use crate::handlers::render::{balance_line, money};
use crate::handlers::{CommandResult, Flow, Reply, expect_args, parse_amount};
use crate::models::account::AccountKind;
use crate::models::employee::{Employee, Permission};
use crate::services::bank::Bank;

/// Run one command for the session of `employee`.
pub fn handle(
    bank: &mut Bank,
    employee: &Employee,
    command: &str,
    parts: &[&str],
) -> (CommandResult, Flow) {
    if command == "close" {
        return (
            Ok(Reply::text(format!("Operations for {} closed", employee.tag()))),
            Flow::Close,
        );
    }

    let result = match command {
        "lookup" => lookup(bank, employee, parts),
        "approve" => approve(bank, employee, parts),
        "change" => change(bank, employee, parts),
        "see" => see(bank, employee, parts),
        _ => Err(BankError::InvalidCommand(format!(
            "Unknown command: {}",
            parts.join(" ")
        ))),
    };
    (result, Flow::Stay)
}

fn lookup(bank: &Bank, employee: &Employee, parts: &[&str]) -> CommandResult {
    expect_args(parts, 2, "lookup <holder>")?;
    let report = employee.lookup(parts[1], bank)?;

    let line = balance_line(&report);
    Ok(Reply::text(format!("{}'s current {}", parts[1], lowercase_first(&line))).with_data(&report))
}

fn approve(bank: &mut Bank, employee: &Employee, parts: &[&str]) -> CommandResult {
    if parts.len() != 2 || !parts[1].eq_ignore_ascii_case("loan") {
        return Err(BankError::InvalidCommand(
            "Invalid command format, expected 'approve loan'".to_string(),
        ));
    }

    let approved = employee.approve_loan(bank)?;
    if approved.is_empty() {
        return Ok(Reply::text("No pending loan requests"));
    }

    let lines: Vec<String> = approved
        .iter()
        .map(|loan| format!("Loan for {} approved", loan.holder))
        .collect();
    Ok(Reply::text(lines.join("\n")).with_data(&approved))
}

/// `change <kind...> <rate>`; the kind may span several words.
fn change(bank: &mut Bank, employee: &Employee, parts: &[&str]) -> CommandResult {
    employee.authorize(Permission::ChangeInterestRate)?;
    if parts.len() < 3 {
        return Err(BankError::InvalidCommand(
            "Invalid command format, expected 'change <kind> <rate>'".to_string(),
        ));
    }

    let kind = AccountKind::from_str(&parts[1..parts.len() - 1].join(" "))?;
    let percent = parse_amount(parts[parts.len() - 1].trim_end_matches('%'))?;
    employee.change_interest_rate(kind, percent, bank)?;

    Ok(Reply::text(format!(
        "Interest rate for {} Account changed to {}%",
        kind,
        money(percent)
    )))
}

fn see(bank: &Bank, employee: &Employee, parts: &[&str]) -> CommandResult {
    expect_args(parts, 1, "see")?;
    let funds = employee.see_internal_fund(bank)?;

    Ok(Reply::text(format!("Internal Funds: {}$", money(funds))))
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
