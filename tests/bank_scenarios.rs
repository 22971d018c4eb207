//! End-to-end behaviour of the bank through its public API.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use retail_bank_simulator::{
    AccountKind, Bank, BankError, Config, Dispatcher, Employee, OutputFormat,
};

fn staff(bank: &Bank, tag: &str) -> Employee {
    bank.employee(tag).unwrap().clone()
}

fn internal_funds(bank: &Bank) -> Decimal {
    staff(bank, "MD").see_internal_fund(bank).unwrap()
}

#[test]
fn test_savings_rejected_withdrawal_scenario() {
    let mut bank = Bank::default();

    bank.create_account("Alice", AccountKind::Savings, dec!(5000))
        .unwrap();
    assert_eq!(bank.deposit("Alice", dec!(1000)), Ok(dec!(6000)));

    let result = bank.withdraw("Alice", dec!(5200));
    assert!(matches!(result, Err(BankError::TransactionDeclined { .. })));
    assert_eq!(bank.query_balance("Alice").unwrap().balance, dec!(6000));
}

#[test]
fn test_fixed_deposit_loan_scenario() {
    let mut bank = Bank::default();

    bank.create_account("Bob", AccountKind::FixedDeposit, dec!(100000))
        .unwrap();
    bank.request_loan("Bob", dec!(50000)).unwrap();
    staff(&bank, "MD").approve_loan(&mut bank).unwrap();

    let report = bank.query_balance("Bob").unwrap();
    assert_eq!(report.balance, dec!(150000));
    assert_eq!(report.loan_amount, dec!(50000));
    assert!(!bank.is_loan_request_pending());
}

#[test]
fn test_balance_equals_accepted_flow() {
    let mut rng = StdRng::seed_from_u64(17);

    for kind in AccountKind::ALL {
        let mut bank = Bank::default();
        let initial = dec!(150000);
        bank.create_account("walker", kind, initial).unwrap();

        let mut expected = initial;
        for _ in 0..200 {
            let amount = Decimal::from(rng.random_range(1..80_000u32));
            if rng.random_bool(0.5) {
                if bank.deposit("walker", amount).is_ok() {
                    expected += amount;
                }
            } else if bank.withdraw("walker", amount).is_ok() {
                expected -= amount;
            }
        }

        assert_eq!(
            bank.query_balance("walker").unwrap().balance,
            expected,
            "kind {kind}"
        );
    }
}

#[test]
fn test_savings_withdrawal_boundary_randomized() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..500 {
        let mut bank = Bank::default();
        let balance = Decimal::from(rng.random_range(1_000..20_000u32));
        bank.create_account("Alice", AccountKind::Savings, balance)
            .unwrap();

        // Straddle balance - 1000 by a few units either way
        let offset = Decimal::from(rng.random_range(-5..=5i32));
        let amount = balance - dec!(1000) + offset;
        if amount <= Decimal::ZERO {
            continue;
        }

        let accepted = bank.withdraw("Alice", amount).is_ok();
        assert_eq!(accepted, balance - amount >= dec!(1000), "{balance} - {amount}");
    }
}

#[test]
fn test_student_withdrawal_rule_randomized() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..500 {
        let mut bank = Bank::default();
        let balance = Decimal::from(rng.random_range(0..3_000u32));
        bank.create_account("Sam", AccountKind::Student, balance)
            .unwrap();

        let amount = Decimal::from(rng.random_range(1..2_500u32));
        let accepted = bank.withdraw("Sam", amount).is_ok();

        assert_eq!(
            accepted,
            amount <= dec!(1000) && balance - amount >= Decimal::ZERO,
            "{balance} - {amount}"
        );
    }
}

#[test]
fn test_fixed_deposit_opening_threshold() {
    let mut bank = Bank::default();

    for (holder, deposit) in [("a", dec!(0)), ("b", dec!(99999)), ("c", dec!(99999.99))] {
        assert!(matches!(
            bank.create_account(holder, AccountKind::FixedDeposit, deposit),
            Err(BankError::InitialDepositTooLow { .. })
        ));
        assert!(!bank.has_account(holder));
    }

    let account = bank
        .create_account("d", AccountKind::FixedDeposit, dec!(100000))
        .unwrap();
    assert_eq!(account.balance(), dec!(100000));
}

#[test]
fn test_loan_rejections_leave_state_unchanged() {
    let config = Config {
        initial_funds: 0,
        ..Config::default()
    };
    let mut bank = Bank::new(&config);
    bank.create_account("Alice", AccountKind::Savings, dec!(4000))
        .unwrap();

    // Over the 10,000 ceiling
    assert!(matches!(
        bank.request_loan("Alice", dec!(10001)),
        Err(BankError::LoanCeilingExceeded { .. })
    ));
    // Within the ceiling but more than the bank holds
    assert!(matches!(
        bank.request_loan("Alice", dec!(4001)),
        Err(BankError::InsufficientInternalFunds { .. })
    ));

    assert!(!bank.is_loan_request_pending());
    assert_eq!(bank.pending_loans().count(), 0);
    let report = bank.query_balance("Alice").unwrap();
    assert_eq!(report.balance, dec!(4000));
    assert_eq!(report.loan_amount, Decimal::ZERO);
}

#[test]
fn test_role_matrix_never_mutates() {
    let mut bank = Bank::default();
    bank.create_account("Alice", AccountKind::Savings, dec!(5000))
        .unwrap();
    bank.request_loan("Alice", dec!(1000)).unwrap();
    let funds = internal_funds(&bank);

    let officer = staff(&bank, "O1");
    assert!(matches!(
        officer.change_interest_rate(AccountKind::Savings, dec!(50), &mut bank),
        Err(BankError::PermissionDenied { .. })
    ));
    assert!(matches!(
        officer.see_internal_fund(&bank),
        Err(BankError::PermissionDenied { .. })
    ));

    let cashier = staff(&bank, "C5");
    assert!(matches!(
        cashier.approve_loan(&mut bank),
        Err(BankError::PermissionDenied { .. })
    ));
    assert!(matches!(
        cashier.change_interest_rate(AccountKind::Student, dec!(1), &mut bank),
        Err(BankError::PermissionDenied { .. })
    ));

    assert_eq!(bank.interest_rate(AccountKind::Savings), dec!(0.10));
    assert_eq!(bank.interest_rate(AccountKind::Student), dec!(0.05));
    assert!(bank.is_loan_request_pending());
    assert_eq!(bank.query_balance("Alice").unwrap().loan_amount, Decimal::ZERO);
    assert_eq!(internal_funds(&bank), funds);
}

#[test]
fn test_year_end_solvent_formula() {
    let mut bank = Bank::default();
    bank.create_account("Alice", AccountKind::Savings, dec!(8000))
        .unwrap();
    bank.request_loan("Alice", dec!(4000)).unwrap();
    staff(&bank, "O2").approve_loan(&mut bank).unwrap();

    let before = bank.query_balance("Alice").unwrap();
    let (b, l) = (before.balance, before.loan_amount);
    let r = bank.interest_rate(AccountKind::Savings);

    let year_end = bank.increment_year().unwrap();

    let after = bank.query_balance("Alice").unwrap();
    assert_eq!(after.balance, b + b * r - l * dec!(0.10) - dec!(500));
    assert_eq!(after.loan_amount, l);
    assert_eq!(year_end.year, 1);
}

#[test]
fn test_year_end_insolvent_shortfall() {
    let mut bank = Bank::default();
    bank.create_account("Zoe", AccountKind::Savings, dec!(100))
        .unwrap();

    bank.increment_year().unwrap();

    // 100 + 10 = 110, then 500 charge leaves 390 owed
    let report = bank.query_balance("Zoe").unwrap();
    assert_eq!(report.balance, Decimal::ZERO);
    assert_eq!(report.loan_amount, dec!(390));

    bank.increment_year().unwrap();

    // 0 interest; 39 loan interest and 500 charge both become debt
    let report = bank.query_balance("Zoe").unwrap();
    assert_eq!(report.balance, Decimal::ZERO);
    assert_eq!(report.loan_amount, dec!(929));
    assert_eq!(bank.year(), 2);
}

#[test]
fn test_fixed_deposit_opens_mature_and_stays_mature() {
    let mut bank = Bank::default();
    bank.create_account("Bob", AccountKind::FixedDeposit, dec!(100000))
        .unwrap();

    // Withdrawals never re-lock the account
    assert!(bank.account("Bob").unwrap().is_mature());
    assert_eq!(bank.withdraw("Bob", dec!(10000)), Ok(dec!(90000)));
    assert!(bank.account("Bob").unwrap().is_mature());

    bank.increment_year().unwrap();

    assert!(bank.account("Bob").unwrap().is_mature());
    // 90000 + 13500 - 500
    assert_eq!(bank.withdraw("Bob", dec!(3000)), Ok(dec!(100000)));
}

#[test]
fn test_internal_funds_round_trip() {
    let mut bank = Bank::default();
    bank.create_account("Alice", AccountKind::Savings, dec!(5000))
        .unwrap();
    let before = internal_funds(&bank);

    bank.deposit("Alice", dec!(2500)).unwrap();
    assert_eq!(internal_funds(&bank), before + dec!(2500));
    bank.withdraw("Alice", dec!(2500)).unwrap();

    assert_eq!(internal_funds(&bank), before);
}

#[test]
fn test_console_session_transcript() {
    let mut dispatcher = Dispatcher::new(Bank::default(), OutputFormat::Text);
    let script = [
        ("create Bob fixed_deposit 100,000", "Fixed Deposit account for Bob created; initial balance 100000$"),
        ("request 50,000", "Loan request successful, sent for approval (yearly interest 5000$)"),
        ("close", "Transaction for Bob closed"),
        ("open C1", "C1 (Cashier) session opened"),
        ("approve loan", "Error: You don't have permission for this operation (C1: approve loan)"),
        ("close", "Operations for C1 closed"),
        ("open MD", "MD (Managing Director) session opened"),
        ("approve loan", "Loan for Bob approved"),
        ("lookup bob", "bob's current balance 150000$, loan 50000$"),
        ("see", "Internal Funds: 1100000$"),
        ("close", "Operations for MD closed"),
        ("inc", "1 year(s) passed"),
        ("open Bob", "Welcome, Bob"),
        ("query", "Current Balance 167000$, loan 50000$"),
    ];

    for (line, expected) in script {
        let step = dispatcher.handle_line(line).unwrap();
        assert_eq!(dispatcher.render(&step), expected, "command '{line}'");
        assert!(!step.exit);
    }

    let step = dispatcher.handle_line("exit").unwrap();
    assert!(step.exit);
}

#[test]
fn test_oversized_amounts_are_reported_not_applied() {
    let mut dispatcher = Dispatcher::new(Bank::default(), OutputFormat::Text);

    dispatcher.handle_line("create Eve savings 5000").unwrap();
    let step = dispatcher
        .handle_line("deposit 79,228,162,514,264,337,593,543,900,000")
        .unwrap();
    assert!(matches!(step.result, Err(BankError::InvalidAmount(_))));
    assert!(dispatcher.render(&step).starts_with("Error: Invalid amount"));
    assert_eq!(dispatcher.bank().account("Eve").unwrap().balance(), dec!(5000));
    dispatcher.handle_line("close").unwrap();

    dispatcher.handle_line("open MD").unwrap();
    dispatcher
        .handle_line("change savings 7922816251426433759354395033")
        .unwrap()
        .result
        .unwrap();
    let step = dispatcher.handle_line("see").unwrap();
    assert_eq!(dispatcher.render(&step), "Internal Funds: 1005000$");
    dispatcher.handle_line("close").unwrap();

    let step = dispatcher.handle_line("inc").unwrap();
    assert!(dispatcher.render(&step).starts_with("Error: Invalid amount"));
    assert_eq!(dispatcher.bank().year(), 0);
    assert_eq!(dispatcher.bank().account("Eve").unwrap().balance(), dec!(5000));
}
