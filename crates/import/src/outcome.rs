use ledgerscan_core::Transaction;
use serde::Serialize;
use std::fmt;

/// Why a table row or statement line did not become a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    BlankRow,
    MissingDate,
    MissingDescription,
    /// A transaction was closed before any amount was seen.
    MissingAmount,
    /// The row has no amount cell for the bank's column policy to read.
    NoAmount,
    InvalidAmount(String),
    /// A header-resolved column lies beyond the end of the row.
    RaggedRow,
    BalanceLine,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BlankRow => f.write_str("blank row"),
            SkipReason::MissingDate => f.write_str("missing date"),
            SkipReason::MissingDescription => f.write_str("missing description"),
            SkipReason::MissingAmount => f.write_str("transaction closed without an amount"),
            SkipReason::NoAmount => f.write_str("no amount cell"),
            SkipReason::InvalidAmount(raw) => write!(f, "invalid amount {raw:?}"),
            SkipReason::RaggedRow => f.write_str("row shorter than header"),
            SkipReason::BalanceLine => f.write_str("running balance"),
        }
    }
}

/// `position` is the row index within its table (header = 0) for table rows,
/// or the 1-based line number within the document text for line parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSkip {
    pub position: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Parsed(Transaction),
    Skipped(RowSkip),
}

impl RowOutcome {
    pub fn skipped(position: usize, reason: SkipReason) -> Self {
        RowOutcome::Skipped(RowSkip { position, reason })
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            RowOutcome::Parsed(tx) => Some(tx),
            RowOutcome::Skipped(_) => None,
        }
    }
}

/// Split outcomes into parsed transactions and skips, each in encounter order.
pub fn partition(outcomes: Vec<RowOutcome>) -> (Vec<Transaction>, Vec<RowSkip>) {
    let mut parsed = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            RowOutcome::Parsed(tx) => parsed.push(tx),
            RowOutcome::Skipped(skip) => skipped.push(skip),
        }
    }
    (parsed, skipped)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRejection {
    TooFewRows,
    NoDateColumn,
    /// The bank has no table column policy; its statements go through line parsing.
    UnsupportedBank,
}

impl fmt::Display for TableRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableRejection::TooFewRows => "fewer than two rows",
            TableRejection::NoDateColumn => "no date column",
            TableRejection::UnsupportedBank => "bank has no table policy",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableVerdict {
    Rejected(TableRejection),
    Interpreted(Vec<RowOutcome>),
}

impl TableVerdict {
    pub fn into_outcomes(self) -> Vec<RowOutcome> {
        match self {
            TableVerdict::Rejected(_) => Vec::new(),
            TableVerdict::Interpreted(outcomes) => outcomes,
        }
    }

    pub fn transactions(self) -> Vec<Transaction> {
        partition(self.into_outcomes()).0
    }
}
