use ledgerscan_core::Money;

use crate::outcome::{RowOutcome, SkipReason};
use crate::util::{amount_pattern, is_balance_line, re};

use super::{numbered_lines, Accumulator};

re!(
    re_start,
    concat!(
        r"^(?P<date>\d{2} [A-Za-z]{3} \d{4}|\d{2}-[A-Za-z]{3}-\d{4})",
        r"\s+(?P<desc>.*?)(?:\s+(?P<first>",
        amount_pattern!(),
        r"))?(?:\s+(?P<second>",
        amount_pattern!(),
        r"))?$"
    )
);
re!(
    re_reference,
    concat!(r"^Reference:\s*(?P<text>.*?)(?:\s+(?P<amount>", amount_pattern!(), r"))?$")
);

fn magnitude(caps: &regex::Captures<'_>, name: &str) -> Option<Money> {
    caps.name(name).and_then(|m| Money::parse_magnitude(m.as_str()))
}

/// HBZ Bank statements: `<DD Mon YYYY> <description> [<debit>] [<credit>]`,
/// with `Reference:` lines that either continue a transaction or, when they
/// carry an amount, split off a sub-transaction under the same date.
///
/// EFT debits are printed unsigned. Every line mentioning `EFT` negates the
/// amount accumulated so far, so two such lines in one transaction cancel out.
pub fn interpret(text: &str) -> Vec<RowOutcome> {
    let mut acc = Accumulator::new();

    for (position, line) in numbered_lines(text) {
        if let Some(caps) = re_start().captures(line) {
            let amount = match (magnitude(&caps, "first"), magnitude(&caps, "second")) {
                (Some(debit), Some(credit)) => Some(credit - debit),
                (Some(single), None) => Some(single),
                _ => None,
            };
            acc.start(position, &caps["date"], &caps["desc"], amount);
        } else if let Some(caps) = re_reference().captures(line) {
            match magnitude(&caps, "amount") {
                Some(amount) => match acc.last_date().map(str::to_string) {
                    Some(date) => acc.start(position, &date, &caps["text"], Some(amount)),
                    None => acc.skip(position, SkipReason::MissingDate),
                },
                None => acc.append(&caps["text"]),
            }
        } else if is_balance_line(line) {
            acc.skip(position, SkipReason::BalanceLine);
            continue;
        } else {
            acc.append(line);
        }

        if line.contains("EFT") {
            acc.negate_amount();
        }
    }

    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::partition;

    #[test]
    fn single_amount_is_taken_as_reported() {
        let (txs, _) = partition(interpret("02 Jan 2024 Cash Deposit 5,000.00"));
        assert_eq!(txs[0].date, "02 Jan 2024");
        assert_eq!(txs[0].description, "Cash Deposit");
        assert_eq!(txs[0].amount, Money::from_cents(500000));
    }

    #[test]
    fn two_amounts_net_credit_minus_debit() {
        let (txs, _) = partition(interpret("03-Jan-2024 Cheque Clearing 200.00 50.00"));
        assert_eq!(txs[0].date, "03-Jan-2024");
        assert_eq!(txs[0].amount, Money::from_cents(-15000));
    }

    #[test]
    fn amount_can_arrive_on_reference_split() {
        let text = "\
04 Jan 2024 Inward Remittance
Reference: Invoice ACME 1,250.00
";
        let (txs, skips) = partition(interpret(text));
        // The dated line never got an amount; the reference opened its own transaction.
        assert_eq!(skips[0].reason, SkipReason::MissingAmount);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].date, "04 Jan 2024");
        assert_eq!(txs[0].description, "Invoice ACME");
        assert_eq!(txs[0].amount, Money::from_cents(125000));
    }

    #[test]
    fn reference_without_amount_continues_description() {
        let text = "\
05 Jan 2024 Transfer 300.00
Reference: Rent March
";
        let (txs, _) = partition(interpret(text));
        assert_eq!(txs[0].description, "Transfer Rent March");
    }

    #[test]
    fn eft_line_negates_amount() {
        let text = "\
06 Jan 2024 Payment 750.00
EFT to Supplier
";
        let (txs, _) = partition(interpret(text));
        assert_eq!(txs[0].amount, Money::from_cents(-75000));
        assert_eq!(txs[0].description, "Payment EFT to Supplier");
    }

    #[test]
    fn eft_on_start_line_negates_its_own_amount() {
        let (txs, _) = partition(interpret("07 Jan 2024 EFT Debit Vodacom 199.00"));
        assert_eq!(txs[0].amount, Money::from_cents(-19900));
    }

    #[test]
    fn two_eft_lines_flip_twice() {
        let text = "\
08 Jan 2024 EFT Payment 100.00
EFT batch 17
";
        let (txs, _) = partition(interpret(text));
        assert_eq!(txs[0].amount, Money::from_cents(10000));
    }

    #[test]
    fn balance_line_is_skipped_without_flipping() {
        let text = "09 Jan 2024 Payment 100.00\n12,400.00\n";
        let (txs, skips) = partition(interpret(text));
        assert_eq!(txs[0].amount, Money::from_cents(10000));
        assert_eq!(skips[0].reason, SkipReason::BalanceLine);
    }

    #[test]
    fn reference_amount_before_any_date_is_skipped() {
        let (txs, skips) = partition(interpret("Reference: orphan 10.00"));
        assert!(txs.is_empty());
        assert_eq!(skips[0].reason, SkipReason::MissingDate);
    }
}
