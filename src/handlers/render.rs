//! Reply rendering for the operator console.
//!
//! # JSON Format
//!
//! Successful replies:
//! ```json
//! { "ok": true, "message": "1 year(s) passed", "data": { ... } }
//! ```
//!
//! Rejections:
//! ```json
//! { "error": { "code": "transaction_declined", "message": "..." } }
//! ```

use rust_decimal::Decimal;
use serde_json::json;

use crate::config::OutputFormat;
use crate::handlers::CommandResult;
use crate::services::bank::BalanceReport;

/// Format an amount without trailing zeros (`6000.00` -> `6000`).
pub fn money(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// `Balance 6000$` or `Balance 6000$, loan 2000$` when a loan is outstanding.
pub fn balance_line(report: &BalanceReport) -> String {
    if report.loan_amount.is_zero() {
        format!("Balance {}$", money(report.balance))
    } else {
        format!(
            "Balance {}$, loan {}$",
            money(report.balance),
            money(report.loan_amount)
        )
    }
}

pub fn render(result: &CommandResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => match result {
            Ok(reply) => reply.message.clone(),
            Err(err) => format!("Error: {err}"),
        },
        OutputFormat::Json => {
            let body = match result {
                Ok(reply) => json!({
                    "ok": true,
                    "message": reply.message,
                    "data": reply.data,
                }),
                Err(err) => json!({
                    "error": {
                        "code": err.code(),
                        "message": err.to_string(),
                    }
                }),
            };
            body.to_string()
        }
    }
}
