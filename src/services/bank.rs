//! Bank service - owns every account, employee and pending loan.
//!
//! This service handles:
//! - Account opening and per-kind deposit/withdraw rules
//! - Loan requests, ceilings and bulk approval
//! - Internal funds bookkeeping
//! - The year-end interest and fee cycle
//! - The operation audit log
//!
//! # Consistency
//!
//! Every operation validates fully before applying any effect, so an `Err`
//! always leaves the bank exactly as it was. The whole `Bank` is one
//! consistency domain; a multi-client front end must serialize access to it
//! as a unit.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::Config;
use crate::error::{BankError, BankResult};
use crate::models::account::{Account, AccountKind};
use crate::models::employee::{Employee, Role};
use crate::models::loan::Loan;
use crate::models::operation::Operation;
use crate::services::interest::{self, Accrual, InterestRates};

/// Balance and outstanding loan of one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub holder: String,
    pub balance: Decimal,
    pub loan_amount: Decimal,
}

impl From<&Account> for BalanceReport {
    fn from(account: &Account) -> Self {
        Self {
            holder: account.holder().to_string(),
            balance: account.balance(),
            loan_amount: account.loan_amount(),
        }
    }
}

/// Result of one year-end tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEnd {
    /// Year counter after the tick
    pub year: u32,
    pub accruals: Vec<Accrual>,
}

#[derive(Debug)]
pub struct Bank {
    internal_funds: Decimal,
    year: u32,
    loan_request_pending: bool,
    /// Keyed by lower-cased holder name
    accounts: BTreeMap<String, Account>,
    /// Keyed by upper-cased tag
    employees: HashMap<String, Employee>,
    /// At most one pending request per lower-cased holder name
    loan_requests: BTreeMap<String, Loan>,
    rates: InterestRates,
    operations: Vec<Operation>,
    officers: u32,
    cashiers: u32,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Bank {
    /// Create a bank with its opening funds and initial staff roster
    /// (`MD`, `O1..On`, `C1..Cm`).
    pub fn new(config: &Config) -> Self {
        let mut bank = Self {
            internal_funds: Decimal::from(config.initial_funds),
            year: 0,
            loan_request_pending: false,
            accounts: BTreeMap::new(),
            employees: HashMap::new(),
            loan_requests: BTreeMap::new(),
            rates: InterestRates::default(),
            operations: Vec::new(),
            officers: 0,
            cashiers: 0,
        };

        bank.add_employee(Employee::new(
            Role::ManagingDirector.tag_prefix(),
            Role::ManagingDirector,
        ));
        for _ in 0..config.officers {
            bank.enroll(Role::Officer);
        }
        for _ in 0..config.cashiers {
            bank.enroll(Role::Cashier);
        }

        tracing::info!(
            internal_funds = %bank.internal_funds,
            officers = bank.officers,
            cashiers = bank.cashiers,
            "bank created"
        );
        bank
    }

    fn add_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.tag().to_string(), employee);
    }

    fn enroll(&mut self, role: Role) -> Employee {
        let counter = match role {
            Role::Officer => &mut self.officers,
            _ => &mut self.cashiers,
        };
        // A tag must not shadow an account holder at `open`
        let tag = loop {
            *counter += 1;
            let tag = format!("{}{}", role.tag_prefix(), counter);
            if !self.accounts.contains_key(&tag.to_lowercase()) {
                break tag;
            }
        };

        let employee = Employee::new(&tag, role);
        self.add_employee(employee.clone());
        employee
    }

    /// Hire the next numbered Officer or Cashier.
    ///
    /// Numbers whose tag matches an existing account holder are skipped.
    ///
    /// # Errors
    ///
    /// - `UnknownEmployeeRole`: the bank has exactly one Managing Director
    pub fn hire_employee(&mut self, role: Role) -> BankResult<Employee> {
        if role == Role::ManagingDirector {
            return Err(BankError::UnknownEmployeeRole(role.to_string()));
        }

        let employee = self.enroll(role);
        tracing::info!(employee = %employee.tag(), role = %role, "employee hired");
        Ok(employee)
    }

    /// Open a new account and add its opening deposit to internal funds.
    ///
    /// # Errors
    ///
    /// - `AccountAlreadyExists`: holder already has an account (case-insensitive)
    /// - `InitialDepositTooLow`: fixed deposit opened below 100,000
    /// - `InvalidAmount`: negative opening deposit, or internal funds would
    ///   leave the decimal range
    pub fn create_account(
        &mut self,
        holder: &str,
        kind: AccountKind,
        initial_deposit: Decimal,
    ) -> BankResult<Account> {
        let key = holder.to_lowercase();
        if self.accounts.contains_key(&key) {
            tracing::warn!(holder, "account already exists");
            return Err(BankError::AccountAlreadyExists(holder.to_string()));
        }

        let account = Account::open(holder, kind, initial_deposit)?;
        self.internal_funds = self
            .internal_funds
            .checked_add(initial_deposit)
            .ok_or_else(|| BankError::overflow("internal funds"))?;
        self.accounts.insert(key, account.clone());

        tracing::info!(holder, kind = %kind, initial_deposit = %initial_deposit, "account created");
        Ok(account)
    }

    /// Deposit into an account. Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is zero or negative, or the balance or
    ///   internal funds would leave the decimal range
    /// - `AccountNotFound`: no such holder
    /// - `TransactionDeclined`: the account kind's deposit rule refused it
    pub fn deposit(&mut self, holder: &str, amount: Decimal) -> BankResult<Decimal> {
        ensure_positive(amount)?;
        let funds = self.internal_funds.checked_add(amount);
        let account = self.account_mut(holder)?;
        let funds = funds.ok_or_else(|| BankError::overflow("internal funds"))?;

        if !account.deposit(amount)? {
            tracing::warn!(holder, amount = %amount, "deposit declined");
            return Err(BankError::declined(holder, "deposit"));
        }

        let balance = account.balance();
        self.internal_funds = funds;
        tracing::info!(holder, amount = %amount, "deposit");
        Ok(balance)
    }

    /// Withdraw from an account. Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is zero or negative
    /// - `AccountNotFound`: no such holder
    /// - `TransactionDeclined`: the account kind's withdrawal rule refused it
    pub fn withdraw(&mut self, holder: &str, amount: Decimal) -> BankResult<Decimal> {
        ensure_positive(amount)?;
        let funds = self.internal_funds.checked_sub(amount);
        let account = self.account_mut(holder)?;
        let funds = funds.ok_or_else(|| BankError::overflow("internal funds"))?;

        if !account.withdraw(amount)? {
            tracing::warn!(holder, amount = %amount, "withdrawal declined");
            return Err(BankError::declined(holder, "withdraw"));
        }

        let balance = account.balance();
        self.internal_funds = funds;
        tracing::info!(holder, amount = %amount, "withdrawal");
        Ok(balance)
    }

    /// File a loan request for approval, replacing any earlier pending
    /// request from the same holder.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is zero or negative
    /// - `AccountNotFound`: no such holder
    /// - `LoanCeilingExceeded`: `amount + loan_amount` is over the kind's ceiling
    /// - `InsufficientInternalFunds`: amount is more than the bank holds
    pub fn request_loan(&mut self, holder: &str, amount: Decimal) -> BankResult<Loan> {
        ensure_positive(amount)?;
        let account = self.account(holder)?;

        if !account.can_borrow(amount) {
            tracing::warn!(holder, amount = %amount, "loan ceiling exceeded");
            return Err(BankError::LoanCeilingExceeded {
                requested: amount,
                outstanding: account.loan_amount(),
                ceiling: account.max_loan(),
            });
        }

        if amount > self.internal_funds {
            tracing::warn!(holder, amount = %amount, "insufficient internal funds for loan");
            return Err(BankError::InsufficientInternalFunds {
                requested: amount,
                available: self.internal_funds,
            });
        }

        let loan = Loan::new(holder, amount);
        if let Some(previous) = self.loan_requests.insert(holder.to_lowercase(), loan.clone()) {
            tracing::info!(holder, replaced = %previous.amount, "pending loan request replaced");
        }
        self.loan_request_pending = true;

        tracing::info!(holder, amount = %amount, "loan requested");
        Ok(loan)
    }

    /// Approve every pending loan request in one step.
    ///
    /// # Process
    ///
    /// 1. Credit each requester's balance and loan amount on a working copy
    /// 2. Commit the accounts, clear the pending set and flag
    ///
    /// Internal funds are not touched; they were checked per request when
    /// each loan was filed.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: a disbursement would leave the decimal range;
    ///   nothing is approved
    pub(crate) fn approve_loans(&mut self) -> BankResult<Vec<Loan>> {
        let mut accounts = self.accounts.clone();
        for (key, loan) in &self.loan_requests {
            let Some(account) = accounts.get_mut(key) else {
                tracing::error!(holder = %loan.holder, "loan request without account");
                continue;
            };

            if let Err(err) = account.disburse_loan(loan.amount) {
                tracing::warn!(
                    holder = %loan.holder,
                    amount = %loan.amount,
                    "loan disbursement overflowed"
                );
                return Err(err);
            }
        }

        self.accounts = accounts;
        self.loan_request_pending = false;
        let approved: Vec<Loan> = std::mem::take(&mut self.loan_requests)
            .into_values()
            .collect();
        for loan in &approved {
            tracing::info!(holder = %loan.holder, amount = %loan.amount, "loan approved");
        }
        Ok(approved)
    }

    /// Self-service balance query.
    pub fn query_balance(&self, holder: &str) -> BankResult<BalanceReport> {
        self.account(holder).map(BalanceReport::from)
    }

    /// Employee-initiated balance lookup.
    pub fn lookup(&self, holder: &str) -> BankResult<BalanceReport> {
        self.account(holder).map(BalanceReport::from)
    }

    /// Set the yearly rate for one kind from a percentage value.
    /// Returns the stored fraction.
    pub(crate) fn change_interest_rate(
        &mut self,
        kind: AccountKind,
        percent: Decimal,
    ) -> BankResult<Decimal> {
        let fraction = self.rates.set_percent(kind, percent)?;
        tracing::info!(kind = %kind, rate = %fraction, "interest rate changed");
        Ok(fraction)
    }

    pub(crate) fn see_internal_fund(&self) -> Decimal {
        self.internal_funds
    }

    /// Run the year-end cycle over every account, then advance the year.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: an accrual left the decimal range; no account
    ///   changes and the year does not advance
    pub fn increment_year(&mut self) -> BankResult<YearEnd> {
        let mut accounts = self.accounts.clone();
        let accruals = accounts
            .values_mut()
            .map(|account| -> BankResult<Accrual> {
                let accrual = interest::accrue(account, &self.rates)?;
                tracing::debug!(
                    holder = %accrual.holder,
                    interest = %accrual.interest,
                    loan_interest = %accrual.loan_interest,
                    added_to_loan = %accrual.added_to_loan,
                    "year-end accrual"
                );
                Ok(accrual)
            })
            .collect::<BankResult<Vec<_>>>()
            .inspect_err(|err| tracing::warn!(error = %err, "year-end cycle aborted"))?;

        self.accounts = accounts;
        self.year += 1;
        tracing::info!(year = self.year, accounts = accruals.len(), "year passed");

        Ok(YearEnd {
            year: self.year,
            accruals,
        })
    }

    /// Append an entry to the operation log, stamped with the current year.
    pub fn add_operation(&mut self, details: &str, actor: &str) {
        self.record_operation(Operation::new(details, actor, self.year));
    }

    /// Append a prepared entry, keeping the year it carries.
    pub fn record_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// The operation log in insertion order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn account(&self, holder: &str) -> BankResult<&Account> {
        self.accounts
            .get(&holder.to_lowercase())
            .ok_or_else(|| BankError::AccountNotFound(holder.to_string()))
    }

    fn account_mut(&mut self, holder: &str) -> BankResult<&mut Account> {
        self.accounts
            .get_mut(&holder.to_lowercase())
            .ok_or_else(|| BankError::AccountNotFound(holder.to_string()))
    }

    pub fn has_account(&self, holder: &str) -> bool {
        self.accounts.contains_key(&holder.to_lowercase())
    }

    pub fn employee(&self, tag: &str) -> BankResult<&Employee> {
        self.employees
            .get(&tag.to_uppercase())
            .ok_or_else(|| BankError::EmployeeNotFound(tag.to_string()))
    }

    pub fn is_employee(&self, tag: &str) -> bool {
        self.employees.contains_key(&tag.to_uppercase())
    }

    /// Staff tags ordered by role, then number (`MD`, `O1`, `O2`, `C1`, ...).
    pub fn employee_tags(&self) -> Vec<&str> {
        let mut staff: Vec<&Employee> = self.employees.values().collect();
        staff.sort_by_key(|employee| {
            let number = employee.tag()[employee.role().tag_prefix().len()..]
                .parse::<u32>()
                .unwrap_or(0);
            (employee.role(), number)
        });
        staff.into_iter().map(Employee::tag).collect()
    }

    pub fn is_loan_request_pending(&self) -> bool {
        self.loan_request_pending
    }

    pub fn pending_loans(&self) -> impl Iterator<Item = &Loan> {
        self.loan_requests.values()
    }

    pub fn interest_rate(&self, kind: AccountKind) -> Decimal {
        self.rates.get(kind)
    }

    pub fn year(&self) -> u32 {
        self.year
    }
}

fn ensure_positive(amount: Decimal) -> BankResult<()> {
    if amount <= Decimal::ZERO {
        return Err(BankError::InvalidAmount(format!(
            "amount must be positive: {amount}"
        )));
    }
    Ok(())
}
