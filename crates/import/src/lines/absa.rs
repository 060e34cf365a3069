use ledgerscan_core::Money;

use crate::outcome::{RowOutcome, SkipReason};
use crate::util::{amount_pattern, is_balance_line, parse_trailing_minus, re};

use super::{is_brought_forward, numbered_lines, Accumulator};

re!(
    re_start,
    concat!(
        r"^(?P<date>\d{1,2}/\d{2}/\d{4}|\d{1,2} [A-Za-z]{3} \d{4}) (?P<desc>.+?) (?P<amount>",
        amount_pattern!(),
        r"-?)(?: ",
        amount_pattern!(),
        r"-?)?$"
    )
);
re!(
    re_service_fee,
    concat!(
        r"(?i)^service fee (?P<amount>",
        amount_pattern!(),
        r"-?)(?: ",
        amount_pattern!(),
        r"-?)?$"
    )
);

/// ABSA statements. Parsing starts at the "Transaction History" heading; each
/// transaction line reads `<date> <description> <amount>[-] [<balance>]`.
pub fn interpret(text: &str) -> Vec<RowOutcome> {
    let mut acc = Accumulator::new();
    let mut active = false;

    for (position, line) in numbered_lines(text) {
        let lower = line.to_lowercase();
        if !active {
            active = lower.contains("transaction history");
            continue;
        }

        if let Some(caps) = re_start().captures(line) {
            let description = &caps["desc"];
            let amount = if is_brought_forward(description) {
                Some(Money::zero())
            } else {
                parse_trailing_minus(&caps["amount"])
            };
            acc.start(position, &caps["date"], description, amount);
        } else if let Some(caps) = re_service_fee().captures(line) {
            let Some(date) = acc.last_date().map(str::to_string) else {
                acc.close();
                acc.skip(position, SkipReason::MissingDate);
                continue;
            };
            let fee = Money::parse_magnitude(&caps["amount"]).map(Money::debit);
            acc.start(position, &date, "Service Fee", fee);
        } else if is_balance_line(line) {
            acc.skip(position, SkipReason::BalanceLine);
        } else if lower.contains("balance") {
            continue;
        } else {
            acc.append(line);
        }
    }

    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::partition;

    fn parse(text: &str) -> Vec<(String, String, String)> {
        partition(interpret(text))
            .0
            .into_iter()
            .map(|t| (t.date, t.description, t.amount.to_string()))
            .collect()
    }

    #[test]
    fn nothing_before_transaction_history() {
        let text = "ABSA Bank\n1/01/2024 Early line 10.00 100.00\n";
        assert!(interpret(text).is_empty());
    }

    #[test]
    fn debit_and_credit_lines() {
        let text = "\
Your Transaction History
2/01/2024 Card Purchase Checkers 250.00- 9,750.00
3/01/2024 Salary ACME 15,000.00 24,750.00
";
        assert_eq!(
            parse(text),
            vec![
                ("2/01/2024".into(), "Card Purchase Checkers".into(), "-250.00".into()),
                ("3/01/2024".into(), "Salary ACME".into(), "15000.00".into()),
            ]
        );
    }

    #[test]
    fn spelled_month_date_and_continuation_lines() {
        let text = "\
Transaction History
5 Feb 2024 Digital Payment 1,200.00-
To: J Smith Plumbing
6 Feb 2024 Cash Deposit 300.00
";
        let txs = parse(text);
        assert_eq!(txs[0].1, "Digital Payment To: J Smith Plumbing");
        assert_eq!(txs[0].2, "-1200.00");
        assert_eq!(txs[1].0, "6 Feb 2024");
    }

    #[test]
    fn brought_forward_has_zero_amount() {
        let text = "Transaction History\n1/01/2024 Balance Brought Forward 10,000.00\n";
        assert_eq!(
            parse(text),
            vec![("1/01/2024".into(), "Balance Brought Forward".into(), "0.00".into())]
        );
    }

    #[test]
    fn service_fee_is_a_debit_under_last_date() {
        let text = "\
Transaction History
4/01/2024 Debit Order Insurance 450.00- 9,300.00
Service Fee 12.50
";
        let txs = parse(text);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1], ("4/01/2024".into(), "Service Fee".into(), "-12.50".into()));
    }

    #[test]
    fn service_fee_without_prior_date_is_skipped() {
        let (txs, skips) = partition(interpret("Transaction History\nService Fee 12.50-\n"));
        assert!(txs.is_empty());
        assert_eq!(skips[0].reason, SkipReason::MissingDate);
    }

    #[test]
    fn balance_lines_are_ignored() {
        let text = "\
Transaction History
2/01/2024 Card Purchase 250.00-
Closing Balance 9,750.00
9,750.00
";
        let (txs, skips) = partition(interpret(text));
        assert_eq!(txs[0].description, "Card Purchase");
        assert_eq!(skips.len(), 1);
        assert_eq!(skips[0].reason, SkipReason::BalanceLine);
    }
}
