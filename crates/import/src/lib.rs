pub mod export;
pub mod lines;
pub mod outcome;
pub mod strategy;
pub mod table;
pub(crate) mod util;

pub use export::{to_csv_string, write_csv, write_json, ExportError};
pub use outcome::{partition, RowOutcome, RowSkip, SkipReason, TableRejection, TableVerdict};
pub use strategy::{process_table, process_text, strategy_for, BankStrategy};
pub use table::{AmountPolicy, ColumnMap};
