use std::fmt;
use std::io::Read;

use crate::application::{LedgerError, LedgerService};
use crate::domain::{format_cents, parse_cents, Cents};

/// One ledger operation from a session script.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Open {
        number: String,
        owner: String,
        initial: Cents,
    },
    Deposit {
        number: String,
        amount: Cents,
    },
    Withdraw {
        number: String,
        amount: Cents,
    },
    Transfer {
        from: String,
        to: String,
        amount: Cents,
    },
    Deactivate {
        number: String,
    },
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Open {
                number,
                owner,
                initial,
            } => write!(f, "open {} {:?} {}", number, owner, format_cents(*initial)),
            Op::Deposit { number, amount } => {
                write!(f, "deposit {} {}", number, format_cents(*amount))
            }
            Op::Withdraw { number, amount } => {
                write!(f, "withdraw {} {}", number, format_cents(*amount))
            }
            Op::Transfer { from, to, amount } => {
                write!(f, "transfer {} {} {}", from, to, format_cents(*amount))
            }
            Op::Deactivate { number } => write!(f, "deactivate {}", number),
        }
    }
}

/// An op tagged with the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOp {
    pub line: u64,
    pub op: Op,
}

/// A line that could not be parsed or an op the ledger rejected.
#[derive(Debug, Clone)]
pub struct SessionFailure {
    pub line: u64,
    pub error: String,
}

/// A whole script split into the ops that parsed and the lines that did not.
#[derive(Debug, Clone, Default)]
pub struct ScriptOps {
    pub ops: Vec<ParsedOp>,
    pub failures: Vec<SessionFailure>,
}

/// Options for running a session script.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Stop at the first failure instead of continuing with later lines.
    pub strict: bool,
    /// Echo each applied op to stderr.
    pub verbose: bool,
}

/// Result of running a session script.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub executed: usize,
    pub failures: Vec<SessionFailure>,
}

/// Applies session scripts against a ledger service.
pub struct SessionRunner<'a> {
    service: &'a mut LedgerService,
}

impl<'a> SessionRunner<'a> {
    pub fn new(service: &'a mut LedgerService) -> Self {
        Self { service }
    }

    /// Parse and apply a whole script.
    ///
    /// Failed lines are collected into the report and later lines still run,
    /// unless `strict` is set, in which case nothing past the first failure
    /// (parse or ledger) is applied.
    pub fn run_script<R: Read>(&mut self, reader: R, options: SessionOptions) -> SessionReport {
        let script = read_ops(reader);
        let mut report = SessionReport::default();
        let mut pending = script.failures.into_iter().peekable();

        for ParsedOp { line, op } in script.ops {
            // Parse failures re-enter the report in script order
            while let Some(failure) = pending.next_if(|f| f.line < line) {
                report.failures.push(failure);
                if options.strict {
                    return report;
                }
            }

            match apply_op(self.service, &op) {
                Ok(()) => {
                    if options.verbose {
                        eprintln!("applied: {}", op);
                    }
                    report.executed += 1;
                }
                Err(e) => {
                    // Alternate display keeps the source chain, so transfer
                    // failures carry their underlying cause into the report.
                    report.failures.push(SessionFailure {
                        line,
                        error: format!("{:#}", anyhow::Error::new(e)),
                    });
                    if options.strict {
                        return report;
                    }
                }
            }
        }

        // Parse failures past the last op
        for failure in pending {
            report.failures.push(failure);
            if options.strict {
                break;
            }
        }

        report
    }
}

/// Apply a single op to the service.
pub fn apply_op(service: &mut LedgerService, op: &Op) -> Result<(), LedgerError> {
    match op {
        Op::Open {
            number,
            owner,
            initial,
        } => service.create_account(number, owner, *initial).map(|_| ()),
        Op::Deposit { number, amount } => service.deposit(number, *amount),
        Op::Withdraw { number, amount } => service.withdraw(number, *amount),
        Op::Transfer { from, to, amount } => service.transfer(from, to, *amount),
        Op::Deactivate { number } => service.deactivate_account(number).map(|_| ()),
    }
}

/// Parse one script line. `None` for blank and comment lines.
pub fn parse_op_line(line: &str) -> Result<Option<Op>, String> {
    let mut csv_reader = script_reader(line.as_bytes());
    match csv_reader.records().next() {
        Some(Ok(record)) => {
            let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
            if fields.is_empty() {
                return Ok(None);
            }
            parse_op(&fields).map(Some)
        }
        Some(Err(e)) => Err(format!("Parse error: {}", e)),
        None => Ok(None),
    }
}

/// Parse a whole script without applying it.
///
/// Blank and comment lines are skipped; every other line becomes either an
/// op tagged with its line number or a failure carrying that number, so a
/// bad line never aborts the read.
pub fn read_ops<R: Read>(reader: R) -> ScriptOps {
    let mut script = ScriptOps::default();

    let mut csv_reader = script_reader(reader);
    for result in csv_reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // The reader position points at the record that failed.
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                script.failures.push(SessionFailure {
                    line,
                    error: format!("Parse error: {}", e),
                });
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }

        match parse_op(&fields) {
            Ok(op) => script.ops.push(ParsedOp { line, op }),
            Err(error) => script.failures.push(SessionFailure { line, error }),
        }
    }

    script
}

/// The script grammar is space-delimited with `#` comments; quoting makes
/// multi-word owner names a single field.
fn script_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader)
}

fn parse_op(fields: &[&str]) -> Result<Op, String> {
    let keyword = fields[0].to_lowercase();
    match keyword.as_str() {
        "open" => {
            let [_, number, owner, initial] =
                expect_fields::<4>(fields, "open NUMBER OWNER INITIAL")?;
            Ok(Op::Open {
                number: number.to_string(),
                owner: owner.to_string(),
                initial: parse_amount(initial)?,
            })
        }
        "deposit" => {
            let [_, number, amount] = expect_fields::<3>(fields, "deposit NUMBER AMOUNT")?;
            Ok(Op::Deposit {
                number: number.to_string(),
                amount: parse_amount(amount)?,
            })
        }
        "withdraw" => {
            let [_, number, amount] = expect_fields::<3>(fields, "withdraw NUMBER AMOUNT")?;
            Ok(Op::Withdraw {
                number: number.to_string(),
                amount: parse_amount(amount)?,
            })
        }
        "transfer" => {
            let [_, from, to, amount] = expect_fields::<4>(fields, "transfer FROM TO AMOUNT")?;
            Ok(Op::Transfer {
                from: from.to_string(),
                to: to.to_string(),
                amount: parse_amount(amount)?,
            })
        }
        "deactivate" => {
            let [_, number] = expect_fields::<2>(fields, "deactivate NUMBER")?;
            Ok(Op::Deactivate {
                number: number.to_string(),
            })
        }
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn expect_fields<'a, const N: usize>(
    fields: &[&'a str],
    usage: &str,
) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(fields).map_err(|_| format!("Usage: {}", usage))
}

fn parse_amount(field: &str) -> Result<Cents, String> {
    parse_cents(field).map_err(|e| format!("Invalid amount: {}", e))
}
