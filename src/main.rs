//! Retail Bank Simulator - Console Entry Point
//!
//! Reads operator commands from stdin, one per line, and prints one reply per
//! command. Replies go to stdout; logs go to stderr.
//!
//! # Startup Flow
//!
//! 1. Initialize logging from `RUST_LOG`
//! 2. Load configuration from `BANK_*` environment variables
//! 3. Create the bank with its opening funds and staff
//! 4. Dispatch commands until `exit` or end of input

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use retail_bank_simulator::{Bank, Config, Dispatcher};

fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "warn" so the transcript stays readable)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let bank = Bank::new(&config);
    let mut dispatcher = Dispatcher::new(bank, config.output);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "Bank Created; {} created",
        dispatcher.bank().employee_tags().join(", ")
    )?;
    writeln!(out, "Enter a command (type 'exit' to quit): ")?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some(step) = dispatcher.handle_line(&line) else {
            continue;
        };

        writeln!(out, "{}", dispatcher.render(&step))?;
        out.flush()?;

        if step.exit {
            break;
        }
    }

    Ok(())
}
