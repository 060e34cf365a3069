use ledgerscan_core::Money;

use crate::outcome::{RowOutcome, SkipReason};
use crate::util::{amount_pattern, is_balance_line, parse_trailing_minus, re};

use super::{is_brought_forward, numbered_lines, Accumulator};

re!(
    re_start,
    concat!(
        r"^(?P<desc>.+?)(?: ##)? (?:(?P<amount>",
        amount_pattern!(),
        r"-?) )?(?P<date>\d{2} \d{2}) ",
        amount_pattern!(),
        r"-?$"
    )
);

/// Standard Bank statements print the date after the amount:
/// `<description> [##] [<amount>[-]] <MM DD> <balance>`.
pub fn interpret(text: &str) -> Vec<RowOutcome> {
    let mut acc = Accumulator::new();

    for (position, line) in numbered_lines(text) {
        if let Some(caps) = re_start().captures(line) {
            let description = &caps["desc"];
            let amount = if is_brought_forward(description) {
                Some(Money::zero())
            } else {
                caps.name("amount").and_then(|m| parse_trailing_minus(m.as_str()))
            };
            match amount {
                Some(amount) => acc.start(position, &caps["date"], description, Some(amount)),
                None => {
                    acc.close();
                    acc.skip(position, SkipReason::MissingAmount);
                }
            }
        } else if is_balance_line(line) {
            acc.skip(position, SkipReason::BalanceLine);
        } else if line.to_lowercase().contains("balance") {
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

    #[test]
    fn date_follows_amount() {
        let text = "\
IB PAYMENT TO ## 1,500.00- 01 15 8,500.00
SALARY ACME 20,000.00 01 25 28,500.00
";
        let (txs, skips) = partition(interpret(text));
        assert!(skips.is_empty());
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date, "01 15");
        assert_eq!(txs[0].description, "IB PAYMENT TO");
        assert_eq!(txs[0].amount, Money::from_cents(-150000));
        assert_eq!(txs[1].amount, Money::from_cents(2000000));
    }

    #[test]
    fn continuation_lines_extend_description() {
        let text = "\
FEE MONTHLY 65.00- 01 31 8,435.00
MANAGEMENT FEE
";
        let (txs, _) = partition(interpret(text));
        assert_eq!(txs[0].description, "FEE MONTHLY MANAGEMENT FEE");
    }

    #[test]
    fn brought_forward_without_amount_is_zero() {
        let (txs, skips) = partition(interpret("BALANCE BROUGHT FORWARD 01 01 10,000.00"));
        assert!(skips.is_empty());
        assert_eq!(txs[0].description, "BALANCE BROUGHT FORWARD");
        assert!(txs[0].amount.is_zero());
    }

    #[test]
    fn start_without_amount_is_skipped() {
        let text = "\
CARD PURCHASE 45.00- 02 01 955.00
MYSTERY LINE 02 02 955.00
";
        let (txs, skips) = partition(interpret(text));
        assert_eq!(txs.len(), 1);
        assert_eq!(skips.len(), 1);
        assert_eq!(skips[0].position, 2);
        assert_eq!(skips[0].reason, SkipReason::MissingAmount);
    }

    #[test]
    fn lone_balance_line_is_skipped() {
        let text = "CARD PURCHASE 45.00- 02 01 1,955.00\n1,955.00";
        let (txs, skips) = partition(interpret(text));
        assert_eq!(txs[0].description, "CARD PURCHASE");
        assert_eq!(txs[0].amount, Money::from_cents(-4500));
        assert_eq!(
            skips,
            vec![crate::outcome::RowSkip { position: 2, reason: SkipReason::BalanceLine }]
        );
    }

    #[test]
    fn balance_text_lines_stay_out_of_descriptions() {
        let text = "CARD PURCHASE 45.00- 02 01 955.00\nCLOSING BALANCE 955.00";
        let (txs, skips) = partition(interpret(text));
        assert!(skips.is_empty());
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "CARD PURCHASE");
        assert_eq!(txs[0].amount, Money::from_cents(-4500));
    }
}
