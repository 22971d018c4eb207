//! Command handlers (the line-oriented operator protocol).
//!
//! Each handler:
//! 1. Receives one tokenized command line
//! 2. Parses its arguments (amounts, kinds, names)
//! 3. Calls the bank or an employee and returns a `Reply`
//!
//! # Sessions
//!
//! - top level: `create`, `open`, `inc`, `hire`, `history`, `exit`
//! - account session (after `create` or `open <holder>`): see [`accounts`]
//! - employee session (after `open <tag>`): see [`employees`]
//!
//! `close` ends a session; `exit` ends the program from anywhere.

/// Account session commands
pub mod accounts;
/// Employee session commands
pub mod employees;
/// Text and JSON reply rendering
pub mod render;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::config::OutputFormat;
use crate::error::BankError;
use crate::models::account::AccountKind;
use crate::models::employee::{Employee, Role};
use crate::models::operation::Operation;
use crate::services::bank::Bank;

/// Successful command output.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Human-readable message, possibly several lines
    pub message: String,

    /// Structured payload used by the JSON renderer
    pub data: Option<Value>,
}

impl Reply {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    /// Attach a JSON payload. A payload that fails to serialize is logged
    /// and dropped; the text message still goes out.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.data = Some(value),
            Err(err) => tracing::warn!(error = %err, "reply payload not serializable"),
        }
        self
    }
}

pub type CommandResult = Result<Reply, BankError>;

/// Whether a session stays open after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Stay,
    Close,
}

/// Who the operator is currently acting as.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Idle,
    Account(String),
    Employee(Employee),
}

/// Outcome of one input line.
#[derive(Debug)]
pub struct Step {
    pub result: CommandResult,
    pub exit: bool,
}

impl Step {
    fn stay(result: CommandResult) -> Self {
        Self {
            result,
            exit: false,
        }
    }
}

/// Routes operator input to the bank, tracking the open session.
#[derive(Debug)]
pub struct Dispatcher {
    bank: Bank,
    session: Session,
    format: OutputFormat,
}

impl Dispatcher {
    pub fn new(bank: Bank, format: OutputFormat) -> Self {
        Self {
            bank,
            session: Session::Idle,
            format,
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn render(&self, step: &Step) -> String {
        render::render(&step.result, self.format)
    }

    /// Handle one input line. Blank lines produce no step.
    pub fn handle_line(&mut self, line: &str) -> Option<Step> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let command = parts.first()?.to_lowercase();

        if command == "exit" {
            return Some(Step {
                result: Ok(Reply::text("Exiting the bank application. Goodbye!")),
                exit: true,
            });
        }

        let step = match self.session.clone() {
            Session::Idle => Step::stay(self.handle_top_level(&command, &parts, line)),
            Session::Account(holder) => {
                let (result, flow) = accounts::handle(&mut self.bank, &holder, &command, &parts);
                self.finish_session_command(&result, flow, line, &holder);
                Step::stay(result)
            }
            Session::Employee(employee) => {
                let (result, flow) =
                    employees::handle(&mut self.bank, &employee, &command, &parts);
                self.finish_session_command(&result, flow, line, employee.tag());
                Step::stay(result)
            }
        };
        Some(step)
    }

    fn finish_session_command(
        &mut self,
        result: &CommandResult,
        flow: Flow,
        line: &str,
        actor: &str,
    ) {
        match flow {
            Flow::Close => self.session = Session::Idle,
            Flow::Stay => {
                if result.is_ok() {
                    self.bank.add_operation(line.trim(), actor);
                }
            }
        }
    }

    fn handle_top_level(&mut self, command: &str, parts: &[&str], line: &str) -> CommandResult {
        match command {
            "create" => {
                let reply = self.create(parts)?;
                self.bank.add_operation(line.trim(), parts[1]);
                Ok(reply)
            }
            "open" => self.open(parts),
            "inc" => {
                expect_args(parts, 1, "inc")?;
                let year = self.bank.year();
                let year_end = self.bank.increment_year()?;
                self.bank.record_operation(Operation::new(line.trim(), "bank", year));
                Ok(Reply::text(format!("{} year(s) passed", year_end.year)).with_data(&year_end))
            }
            "hire" => {
                expect_args(parts, 2, "hire <O|C>")?;
                let role = Role::from_str(parts[1])?;
                let employee = self.bank.hire_employee(role)?;
                self.bank.add_operation(line.trim(), "bank");
                Ok(Reply::text(format!("{} created", employee.tag())).with_data(&employee))
            }
            "history" => {
                expect_args(parts, 1, "history")?;
                Ok(history(&self.bank))
            }
            _ => Err(BankError::InvalidCommand(format!("Unknown command: {}", parts.join(" ")))),
        }
    }

    /// `create <holder> <kind...> <amount>`; opens the new account's session.
    fn create(&mut self, parts: &[&str]) -> CommandResult {
        if parts.len() < 4 {
            return Err(BankError::InvalidCommand(
                "Invalid 'create' command format".to_string(),
            ));
        }

        let holder = parts[1];
        if self.bank.is_employee(holder) {
            return Err(BankError::InvalidCommand(format!(
                "'{holder}' is reserved for an employee"
            )));
        }

        let kind = AccountKind::from_str(&parts[2..parts.len() - 1].join(" "))?;
        let amount = parse_amount(parts[parts.len() - 1])?;
        let account = self.bank.create_account(holder, kind, amount)?;
        self.session = Session::Account(account.holder().to_string());

        Ok(Reply::text(format!(
            "{} account for {} created; initial balance {}$",
            kind,
            account.holder(),
            render::money(account.balance())
        ))
        .with_data(&account))
    }

    /// `open <name>`; starts an employee or account session.
    fn open(&mut self, parts: &[&str]) -> CommandResult {
        expect_args(parts, 2, "open <name>")?;
        let name = parts[1];

        if self.bank.is_employee(name) {
            let employee = self.bank.employee(name)?.clone();
            let reply = Reply::text(format!("{} ({}) session opened", employee.tag(), employee.role()));
            self.session = Session::Employee(employee);
            return Ok(reply);
        }

        if !self.bank.has_account(name) {
            return Err(BankError::AccountNotFound(name.to_string()));
        }

        self.session = Session::Account(name.to_string());
        Ok(Reply::text(format!("Welcome, {name}")))
    }
}

fn history(bank: &Bank) -> Reply {
    let operations = bank.operations();
    if operations.is_empty() {
        return Reply::text("No operations recorded");
    }

    let lines: Vec<String> = operations
        .iter()
        .map(|op| {
            format!(
                "Operation Performed: {}, By: {}, In Year: {}",
                op.details, op.actor, op.year
            )
        })
        .collect();
    Reply::text(lines.join("\n")).with_data(&operations)
}

pub(crate) fn expect_args(parts: &[&str], count: usize, usage: &str) -> Result<(), BankError> {
    if parts.len() == count {
        Ok(())
    } else {
        Err(BankError::InvalidCommand(format!(
            "Invalid command format, expected '{usage}'"
        )))
    }
}

/// Parse an operator-typed amount, ignoring `,` and `_` digit grouping.
pub fn parse_amount(raw: &str) -> Result<Decimal, BankError> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | '_')).collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| BankError::InvalidAmount(format!("malformed amount '{raw}'")))
}
