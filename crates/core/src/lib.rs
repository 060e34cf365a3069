pub mod bank;
#[doc(hidden)]
pub mod macros;
pub mod money;
pub mod sanitize;
pub mod table;
pub mod transaction;

pub use bank::{BankTag, ParseBankTagError};
pub use money::Money;
pub use sanitize::sanitize_description;
pub use table::RawTable;
pub use transaction::Transaction;
