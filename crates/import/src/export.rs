use std::io::Write;

use ledgerscan_core::Transaction;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const CSV_HEADER: [&str; 3] = ["date", "description", "amount"];

/// Write `date,description,amount` rows. Amounts are plain two-place decimals,
/// debits prefixed with `-`.
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for tx in transactions {
        let amount = tx.amount.to_string();
        out.write_record([tx.date.as_str(), tx.description.as_str(), amount.as_str()])?;
    }
    out.flush()?;
    Ok(())
}

pub fn to_csv_string(transactions: &[Transaction]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, transactions)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_json<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, transactions)?;
    Ok(())
}
