pub mod absa;
pub mod fnb;
pub mod generic;
pub mod hbz;
pub mod standard;

use ledgerscan_core::{Money, Transaction};

use crate::outcome::{RowOutcome, SkipReason};

/// Non-blank lines, trimmed, with their 1-based line numbers.
pub(crate) fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

struct OpenTransaction {
    position: usize,
    date: String,
    description: Vec<String>,
    amount: Option<Money>,
}

/// Per-call parse state: idle, or accumulating one transaction.
///
/// Each bank module drives one of these. A start line closes the open
/// transaction and opens a new one; `finish` flushes whatever is still open.
#[derive(Default)]
pub(crate) struct Accumulator {
    open: Option<OpenTransaction>,
    last_date: Option<String>,
    outcomes: Vec<RowOutcome>,
}

impl Accumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Close the open transaction (if any) and open a new one.
    pub(crate) fn start(
        &mut self,
        position: usize,
        date: &str,
        fragment: &str,
        amount: Option<Money>,
    ) {
        self.close();
        self.last_date = Some(date.to_string());
        let mut description = Vec::new();
        if !fragment.trim().is_empty() {
            description.push(fragment.trim().to_string());
        }
        self.open = Some(OpenTransaction { position, date: date.to_string(), description, amount });
    }

    pub(crate) fn append(&mut self, fragment: &str) {
        if let Some(open) = self.open.as_mut() {
            if !fragment.trim().is_empty() {
                open.description.push(fragment.trim().to_string());
            }
        }
    }

    pub(crate) fn set_amount(&mut self, amount: Money) {
        if let Some(open) = self.open.as_mut() {
            open.amount = Some(amount);
        }
    }

    /// Flip the sign of the accumulated amount, if there is one.
    pub(crate) fn negate_amount(&mut self) {
        if let Some(amount) = self.open.as_mut().and_then(|o| o.amount.as_mut()) {
            *amount = -*amount;
        }
    }

    pub(crate) fn last_date(&self) -> Option<&str> {
        self.last_date.as_deref()
    }

    pub(crate) fn skip(&mut self, position: usize, reason: SkipReason) {
        self.outcomes.push(RowOutcome::skipped(position, reason));
    }

    pub(crate) fn close(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let Some(amount) = open.amount else {
            self.skip(open.position, SkipReason::MissingAmount);
            return;
        };
        let tx = Transaction::from_raw(&open.date, &open.description.join(" "), amount);
        if tx.description.is_empty() {
            self.skip(open.position, SkipReason::MissingDescription);
        } else {
            self.outcomes.push(RowOutcome::Parsed(tx));
        }
    }

    pub(crate) fn finish(mut self) -> Vec<RowOutcome> {
        self.close();
        self.outcomes
    }
}

/// Statements print an opening-balance row whose amount column is the balance.
pub(crate) fn is_brought_forward(description: &str) -> bool {
    description.to_lowercase().contains("brought forward")
}
