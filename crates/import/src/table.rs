use ledgerscan_core::{Money, RawTable, Transaction};

use crate::outcome::{RowOutcome, SkipReason, TableRejection, TableVerdict};

const DESCRIPTION_KEYWORDS: &[&str] = &["detail", "descrip", "particular", "history"];
const AMOUNT_KEYWORDS: &[&str] = &["amount", "transaction amount"];

/// Semantic column positions resolved from header keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    /// Falls back to the first column when no header names a description.
    pub description: usize,
    pub amount: Option<usize>,
    pub debit: Option<usize>,
    pub credit: Option<usize>,
}

impl ColumnMap {
    pub fn from_header(header: &[String]) -> Self {
        let lower: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let find = |keywords: &[&str]| {
            lower
                .iter()
                .position(|h| keywords.iter().any(|k| h.contains(k)))
        };
        ColumnMap {
            date: find(&["date"]),
            description: find(DESCRIPTION_KEYWORDS).unwrap_or(0),
            amount: find(AMOUNT_KEYWORDS),
            debit: find(&["debit"]),
            credit: find(&["credit"]),
        }
    }
}

/// How a bank lays out money in its transaction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPolicy {
    /// One signed amount column (`-`/`Dr`/`Cr` markers); without it, credit minus debit.
    SignedOrNet,
    /// Separate columns: a non-empty debit wins, otherwise the credit.
    DebitFirst,
}

impl AmountPolicy {
    fn resolve(self, row: &[String], columns: &ColumnMap) -> Result<Money, SkipReason> {
        match self {
            AmountPolicy::SignedOrNet => match columns.amount {
                Some(index) => parse_marked(cell(row, index)?),
                None if columns.debit.is_none() && columns.credit.is_none() => {
                    Err(SkipReason::NoAmount)
                }
                None => {
                    let debit = optional_magnitude(row, columns.debit)?;
                    let credit = optional_magnitude(row, columns.credit)?;
                    Ok(credit - debit)
                }
            },
            AmountPolicy::DebitFirst => {
                if let Some(index) = columns.debit {
                    let raw = cell(row, index)?;
                    if !raw.is_empty() {
                        return magnitude(raw).map(Money::debit);
                    }
                }
                if let Some(index) = columns.credit {
                    let raw = cell(row, index)?;
                    if !raw.is_empty() {
                        return magnitude(raw).map(Money::credit);
                    }
                }
                Err(SkipReason::NoAmount)
            }
        }
    }
}

/// Interpret a table under a column policy. `None` means the bank has no
/// table support; the table is rejected once the structural checks pass.
pub fn interpret(table: &RawTable, policy: Option<AmountPolicy>) -> TableVerdict {
    let Some(header) = table.header().filter(|_| table.len() >= 2) else {
        return TableVerdict::Rejected(TableRejection::TooFewRows);
    };
    let columns = ColumnMap::from_header(header);
    let Some(date_column) = columns.date else {
        return TableVerdict::Rejected(TableRejection::NoDateColumn);
    };
    let Some(policy) = policy else {
        return TableVerdict::Rejected(TableRejection::UnsupportedBank);
    };

    let outcomes = table
        .data_rows()
        .map(|(position, row)| match interpret_row(row, date_column, &columns, policy) {
            Ok(tx) => RowOutcome::Parsed(tx),
            Err(reason) => RowOutcome::skipped(position, reason),
        })
        .collect();
    TableVerdict::Interpreted(outcomes)
}

fn interpret_row(
    row: &[String],
    date_column: usize,
    columns: &ColumnMap,
    policy: AmountPolicy,
) -> Result<Transaction, SkipReason> {
    if row.iter().all(|c| c.trim().is_empty()) {
        return Err(SkipReason::BlankRow);
    }
    let date = cell(row, date_column)?;
    let description = cell(row, columns.description)?;
    if date.is_empty() {
        return Err(SkipReason::MissingDate);
    }
    if description.is_empty() {
        return Err(SkipReason::MissingDescription);
    }

    let amount = policy.resolve(row, columns)?;
    let tx = Transaction::from_raw(date, description, amount);
    if tx.description.is_empty() {
        return Err(SkipReason::MissingDescription);
    }
    Ok(tx)
}

fn cell(row: &[String], index: usize) -> Result<&str, SkipReason> {
    row.get(index).map(|c| c.trim()).ok_or(SkipReason::RaggedRow)
}

fn magnitude(raw: &str) -> Result<Money, SkipReason> {
    Money::parse_magnitude(raw).ok_or_else(|| SkipReason::InvalidAmount(raw.to_string()))
}

/// Debit/credit cell for net computation; an absent column or blank cell is zero.
fn optional_magnitude(row: &[String], index: Option<usize>) -> Result<Money, SkipReason> {
    let Some(index) = index else {
        return Ok(Money::zero());
    };
    let raw = cell(row, index)?;
    if raw.is_empty() {
        return Ok(Money::zero());
    }
    magnitude(raw)
}

/// Signed single-column amount: trailing `-` or `Dr` is a debit, `Cr` forces a credit.
fn parse_marked(raw: &str) -> Result<Money, SkipReason> {
    let compact: String = raw.chars().filter(|c| *c != ' ').collect();
    if compact.is_empty() {
        return Err(SkipReason::NoAmount);
    }
    let debit = (compact.ends_with('-') || compact.contains("Dr")) && !compact.contains("Cr");
    let value = magnitude(&compact)?;
    Ok(if debit { value.debit() } else { value.credit() })
}
