use serde::{Deserialize, Serialize};

use super::money::Money;
use super::sanitize::sanitize_description;

/// One statement line item: the date as printed on the statement, a sanitized
/// description and a signed amount (negative = debit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub amount: Money,
}

impl Transaction {
    /// Build a transaction from raw extracted text. The description is always
    /// passed through [`sanitize_description`].
    pub fn from_raw(date: &str, raw_description: &str, amount: Money) -> Self {
        Transaction {
            date: date.trim().to_string(),
            description: sanitize_description(raw_description),
            amount,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.amount.is_debit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_sanitizes_description() {
        let raw = "Grocery   Store RRN: 123456";
        let tx = Transaction::from_raw(" 01 01 ", raw, Money::from_cents(-15000));
        assert_eq!(tx.date, "01 01");
        assert_eq!(tx.description, "Grocery Store");
        assert!(tx.is_debit());
    }

    #[test]
    fn serializes_amount_as_string_decimal() {
        let tx = Transaction::from_raw("01/01/2024", "Salary", Money::from_cents(2500000));
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["date"], "01/01/2024");
        assert_eq!(json["amount"], "25000.00");
    }
}
