//! Account session commands.
//!
//! - `deposit <amount>`
//! - `withdraw <amount>`
//! - `request <amount>` (loan)
//! - `query`
//! - `close`

use crate::error::BankError;
use crate::handlers::render::{balance_line, money};
use crate::handlers::{CommandResult, Flow, Reply, expect_args, parse_amount};
use crate::services::bank::Bank;

/// Run one command for the account session of `holder`.
pub fn handle(bank: &mut Bank, holder: &str, command: &str, parts: &[&str]) -> (CommandResult, Flow) {
    if command == "close" {
        return (
            Ok(Reply::text(format!("Transaction for {holder} closed"))),
            Flow::Close,
        );
    }

    let result = match command {
        "deposit" => deposit(bank, holder, parts),
        "withdraw" => withdraw(bank, holder, parts),
        "request" => request(bank, holder, parts),
        "query" => query(bank, holder, parts),
        _ => Err(BankError::InvalidCommand(format!(
            "Unknown command: {}",
            parts.join(" ")
        ))),
    };
    (result, Flow::Stay)
}

fn deposit(bank: &mut Bank, holder: &str, parts: &[&str]) -> CommandResult {
    expect_args(parts, 2, "deposit <amount>")?;
    let amount = parse_amount(parts[1])?;
    let balance = bank.deposit(holder, amount)?;

    Ok(Reply::text(format!(
        "{}$ deposited; current balance {}$",
        money(amount),
        money(balance)
    )))
}

fn withdraw(bank: &mut Bank, holder: &str, parts: &[&str]) -> CommandResult {
    expect_args(parts, 2, "withdraw <amount>")?;
    let amount = parse_amount(parts[1])?;
    let balance = bank.withdraw(holder, amount)?;

    Ok(Reply::text(format!(
        "{}$ withdrawn; current balance {}$",
        money(amount),
        money(balance)
    )))
}

fn request(bank: &mut Bank, holder: &str, parts: &[&str]) -> CommandResult {
    expect_args(parts, 2, "request <amount>")?;
    let amount = parse_amount(parts[1])?;
    let loan = bank.request_loan(holder, amount)?;

    Ok(Reply::text(format!(
        "Loan request successful, sent for approval (yearly interest {}$)",
        money(loan.interest())
    ))
    .with_data(&loan))
}

fn query(bank: &Bank, holder: &str, parts: &[&str]) -> CommandResult {
    expect_args(parts, 1, "query")?;
    let report = bank.query_balance(holder)?;

    Ok(Reply::text(format!("Current {}", balance_line(&report))).with_data(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::AccountKind;
    use rust_decimal_macros::dec;

    fn bank_with_alice() -> Bank {
        let mut bank = Bank::default();
        bank.create_account("Alice", AccountKind::Savings, dec!(5000))
            .unwrap();
        bank
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let mut bank = bank_with_alice();

        let (result, flow) = handle(&mut bank, "Alice", "deposit", &["deposit", "2,500"]);
        assert_eq!(flow, Flow::Stay);
        assert_eq!(
            result.unwrap().message,
            "2500$ deposited; current balance 7500$"
        );

        let (result, _) = handle(&mut bank, "Alice", "withdraw", &["withdraw", "500"]);
        assert_eq!(
            result.unwrap().message,
            "500$ withdrawn; current balance 7000$"
        );
    }

    #[test]
    fn test_declined_withdrawal() {
        let mut bank = bank_with_alice();

        let (result, _) = handle(&mut bank, "Alice", "withdraw", &["withdraw", "4500"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid transaction: withdraw declined for Alice"
        );
    }

    #[test]
    fn test_request_and_query_with_loan() {
        let mut bank = bank_with_alice();

        let (result, _) = handle(&mut bank, "Alice", "request", &["request", "2000"]);
        assert_eq!(
            result.unwrap().message,
            "Loan request successful, sent for approval (yearly interest 200$)"
        );
        bank.approve_loans().unwrap();

        let (result, _) = handle(&mut bank, "Alice", "query", &["query"]);
        assert_eq!(
            result.unwrap().message,
            "Current Balance 7000$, loan 2000$"
        );
    }

    #[test]
    fn test_malformed_arguments() {
        let mut bank = bank_with_alice();

        let (result, _) = handle(&mut bank, "Alice", "deposit", &["deposit"]);
        assert!(matches!(result, Err(BankError::InvalidCommand(_))));

        let (result, _) = handle(&mut bank, "Alice", "deposit", &["deposit", "1.2.3"]);
        assert!(matches!(result, Err(BankError::InvalidAmount(_))));
        assert_eq!(bank.query_balance("Alice").unwrap().balance, dec!(5000));
    }

    #[test]
    fn test_close() {
        let mut bank = bank_with_alice();
        let (result, flow) = handle(&mut bank, "Alice", "close", &["close"]);
        assert_eq!(flow, Flow::Close);
        assert_eq!(result.unwrap().message, "Transaction for Alice closed");
    }
}
