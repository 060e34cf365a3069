use ledgerscan_core::{BankTag, RawTable, Transaction};

use crate::lines;
use crate::outcome::{partition, RowOutcome, TableVerdict};
use crate::table::{self, AmountPolicy};

/// Per-bank parsing rules: how the bank's tables carry money, and how its
/// statement text reads line by line.
pub trait BankStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Column policy for tables; `None` when the bank's tables are not interpreted.
    fn amount_policy(&self) -> Option<AmountPolicy>;

    fn interpret_text(&self, text: &str) -> Vec<RowOutcome>;

    fn interpret_table(&self, table: &RawTable) -> TableVerdict {
        table::interpret(table, self.amount_policy())
    }
}

pub struct StandardStrategy;
pub struct FnbStrategy;
pub struct AbsaStrategy;
pub struct HbzStrategy;
/// Nedbank, Capitec and unrecognized statements.
pub struct GenericStrategy;

impl BankStrategy for StandardStrategy {
    fn name(&self) -> &'static str {
        "standard"
    }
    fn amount_policy(&self) -> Option<AmountPolicy> {
        Some(AmountPolicy::DebitFirst)
    }
    fn interpret_text(&self, text: &str) -> Vec<RowOutcome> {
        lines::standard::interpret(text)
    }
}

impl BankStrategy for FnbStrategy {
    fn name(&self) -> &'static str {
        "fnb"
    }
    fn amount_policy(&self) -> Option<AmountPolicy> {
        Some(AmountPolicy::SignedOrNet)
    }
    fn interpret_text(&self, text: &str) -> Vec<RowOutcome> {
        lines::fnb::interpret(text)
    }
}

impl BankStrategy for AbsaStrategy {
    fn name(&self) -> &'static str {
        "absa"
    }
    fn amount_policy(&self) -> Option<AmountPolicy> {
        Some(AmountPolicy::SignedOrNet)
    }
    fn interpret_text(&self, text: &str) -> Vec<RowOutcome> {
        lines::absa::interpret(text)
    }
}

impl BankStrategy for HbzStrategy {
    fn name(&self) -> &'static str {
        "hbz"
    }
    fn amount_policy(&self) -> Option<AmountPolicy> {
        Some(AmountPolicy::DebitFirst)
    }
    fn interpret_text(&self, text: &str) -> Vec<RowOutcome> {
        lines::hbz::interpret(text)
    }
}

impl BankStrategy for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }
    fn amount_policy(&self) -> Option<AmountPolicy> {
        None
    }
    fn interpret_text(&self, text: &str) -> Vec<RowOutcome> {
        lines::generic::interpret(text)
    }
}

pub fn strategy_for(bank: BankTag) -> &'static dyn BankStrategy {
    match bank {
        BankTag::Standard => &StandardStrategy,
        BankTag::Fnb => &FnbStrategy,
        BankTag::Absa => &AbsaStrategy,
        BankTag::Hbz => &HbzStrategy,
        BankTag::Nedbank | BankTag::Capitec | BankTag::Unknown => &GenericStrategy,
    }
}

/// Transactions from one table; rejected tables and skipped rows yield nothing.
pub fn process_table(table: &RawTable, bank: BankTag) -> Vec<Transaction> {
    strategy_for(bank).interpret_table(table).transactions()
}

/// Transactions from statement text via the bank's line rules.
pub fn process_text(text: &str, bank: BankTag) -> Vec<Transaction> {
    partition(strategy_for(bank).interpret_text(text)).0
}
