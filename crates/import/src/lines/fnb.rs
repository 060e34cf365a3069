use ledgerscan_core::Money;

use crate::outcome::{RowOutcome, SkipReason};
use crate::util::{amount_pattern, is_balance_line, re};

use super::{numbered_lines, Accumulator};

re!(
    re_start,
    concat!(
        r"^(?P<date>\d{1,2} [A-Za-z]{3}) (?P<desc>.+?) (?P<amount>",
        amount_pattern!(),
        r")(?P<cr>Cr)? ",
        amount_pattern!(),
        r"(?:Cr|Dr)?$"
    )
);

/// FNB statements: `<DD Mon> <description> <amount>[Cr] <balance>[Cr|Dr]`.
/// Amounts are debits unless suffixed with `Cr`.
pub fn interpret(text: &str) -> Vec<RowOutcome> {
    let mut acc = Accumulator::new();

    for (position, line) in numbered_lines(text) {
        if let Some(caps) = re_start().captures(line) {
            let amount = Money::parse_magnitude(&caps["amount"]).map(|m| {
                if caps.name("cr").is_some() {
                    m.credit()
                } else {
                    m.debit()
                }
            });
            acc.start(position, &caps["date"], &caps["desc"], amount);
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
