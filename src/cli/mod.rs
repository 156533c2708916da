use std::fs::File;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{format_cents, Account};
use crate::io::{apply_op, parse_op_line, Exporter, Op, SessionOptions, SessionRunner};

/// Bancus - In-Memory Bank Account Ledger
#[derive(Parser)]
#[command(name = "bancus")]
#[command(about = "A strict in-memory bank account ledger driven by session scripts")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a session script and report the final balances
    Run {
        /// Script file (stdin if omitted)
        script: Option<String>,

        /// Report format: table, csv, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Write the report to a file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Abort at the first failed line instead of continuing
        #[arg(long)]
        strict: bool,
    },

    /// Interactive session on stdin
    Shell,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Run {
                script,
                format,
                output,
                strict,
            } => run_session_command(
                script.as_deref(),
                &format,
                output.as_deref(),
                strict,
                self.verbose,
            ),

            Commands::Shell => run_shell_command(self.verbose),
        }
    }
}

fn run_session_command(
    script: Option<&str>,
    format: &str,
    output: Option<&str>,
    strict: bool,
    verbose: bool,
) -> Result<()> {
    let mut service = LedgerService::new();
    let options = SessionOptions { strict, verbose };

    let report = match script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script file: {}", path))?;
            SessionRunner::new(&mut service).run_script(file, options)
        }
        None => SessionRunner::new(&mut service).run_script(io::stdin(), options),
    };

    if strict {
        if let Some(failure) = report.failures.first() {
            anyhow::bail!("Stopped at line {}: {}", failure.line, failure.error);
        }
    }

    for failure in &report.failures {
        eprintln!("line {}: {}", failure.line, failure.error);
    }
    if verbose {
        eprintln!(
            "Applied {} op(s), {} failed",
            report.executed,
            report.failures.len()
        );
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            write_report(&service, format, file)
        }
        None => write_report(&service, format, io::stdout()),
    }
}

fn write_report<W: Write>(service: &LedgerService, format: &str, mut writer: W) -> Result<()> {
    match format {
        "table" => write_balances_table(&mut writer, &service.list_accounts()),
        "csv" => {
            Exporter::new(service).export_balances_csv(writer)?;
            Ok(())
        }
        "json" => {
            Exporter::new(service).export_json(writer)?;
            Ok(())
        }
        other => anyhow::bail!("Unknown format: {}. Valid formats: table, csv, json", other),
    }
}

fn write_balances_table<W: Write>(writer: &mut W, accounts: &[Account]) -> Result<()> {
    if accounts.is_empty() {
        writeln!(writer, "No accounts.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<10} {:<24} {:>12} {:<10} {:<12}",
        "NUMBER", "OWNER", "BALANCE", "STATUS", "SINCE"
    )?;
    writeln!(writer, "{}", "-".repeat(72))?;
    for account in accounts {
        let status = if account.is_active() {
            "active"
        } else {
            "inactive"
        };
        writeln!(
            writer,
            "{:<10} {:<24} {:>12} {:<10} {:<12}",
            account.number,
            truncate(&account.owner, 24),
            format_cents(account.balance_cents),
            status,
            account
                .deactivated_on
                .map(|d| d.to_string())
                .unwrap_or_default()
        )?;
    }
    Ok(())
}

fn run_shell_command(verbose: bool) -> Result<()> {
    let mut service = LedgerService::new();
    let stdin = io::stdin();

    println!("bancus shell. Type 'help' for commands, 'quit' to leave.");

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                print_shell_help();
                continue;
            }
            "balances" => {
                write_balances_table(&mut io::stdout(), &service.list_accounts())?;
                continue;
            }
            _ => {}
        }

        match parse_op_line(input) {
            Ok(Some(op)) => match apply_op(&mut service, &op) {
                Ok(()) => {
                    if verbose {
                        eprintln!("applied: {}", op);
                    }
                    report_applied(&service, &op);
                }
                // Alternate display walks the source chain, so a failed
                // transfer also shows its underlying cause.
                Err(e) => eprintln!("Error: {:#}", anyhow::Error::new(e)),
            },
            Ok(None) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn report_applied(service: &LedgerService, op: &Op) {
    match op {
        Op::Open { number, owner, .. } => {
            if let Ok(balance) = service.get_balance(number) {
                println!(
                    "Opened account {} for {} with balance {}",
                    number,
                    owner,
                    format_cents(balance)
                );
            }
        }
        Op::Deposit { number, amount } => {
            if let Ok(balance) = service.get_balance(number) {
                println!(
                    "Deposited {} into account {}. Balance: {}",
                    format_cents(*amount),
                    number,
                    format_cents(balance)
                );
            }
        }
        Op::Withdraw { number, amount } => {
            if let Ok(balance) = service.get_balance(number) {
                println!(
                    "Withdrew {} from account {}. Balance: {}",
                    format_cents(*amount),
                    number,
                    format_cents(balance)
                );
            }
        }
        Op::Transfer { from, to, amount } => {
            println!(
                "Transferred {} from account {} to {}",
                format_cents(*amount),
                from,
                to
            );
        }
        Op::Deactivate { number } => {
            if let Ok(account) = service.get_account(number) {
                let since = account
                    .deactivated_on
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                println!("Deactivated account {} on {}", number, since);
            }
        }
    }
}

fn print_shell_help() {
    println!("Commands:");
    println!("  open NUMBER OWNER INITIAL     open an account (quote multi-word owners)");
    println!("  deposit NUMBER AMOUNT         pay money in");
    println!("  withdraw NUMBER AMOUNT        take money out");
    println!("  transfer FROM TO AMOUNT       move money between accounts");
    println!("  deactivate NUMBER             close an account for withdrawals");
    println!("  balances                      show all accounts");
    println!("  quit                          leave the shell");
}

// Counts characters, not bytes; owner names are free text.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", prefix)
    }
}
