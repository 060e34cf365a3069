use crate::outcome::{RowOutcome, SkipReason};
use crate::util::{is_balance_line, parse_trailing_minus, re};

use super::{numbered_lines, Accumulator};

re!(re_short_date, r"^(?P<date>\d{2} \d{2})(?:\s+(?P<rest>.*))?$");
re!(re_long_date, r"^[A-Za-z]{3} \d{2}, \d{4}$");
re!(re_trailing_amount, r"^(?:(?P<desc>.*?)\s+)?(?P<amount>[\d,]+\.\d{2}-?)$");
re!(re_amount_line, r"^[\d,]+\.\d{2}-?$");

/// Fallback for banks without a dedicated layout. Dates stand on their own line
/// (`02 17` or `Apr 02, 2024`), or lead a line that may end in its amount;
/// otherwise a later bare amount line supplies it.
pub fn interpret(text: &str) -> Vec<RowOutcome> {
    let mut acc = Accumulator::new();

    for (position, line) in numbered_lines(text) {
        if let Some(caps) = re_short_date().captures(line) {
            let date = &caps["date"];
            let rest = caps.name("rest").map_or("", |m| m.as_str());
            match re_trailing_amount().captures(rest) {
                Some(found) => {
                    let fragment = found.name("desc").map_or("", |m| m.as_str());
                    acc.start(position, date, fragment, parse_trailing_minus(&found["amount"]));
                }
                None => acc.start(position, date, rest, None),
            }
        } else if re_long_date().is_match(line) {
            acc.start(position, line, "", None);
        } else if is_balance_line(line) {
            acc.skip(position, SkipReason::BalanceLine);
        } else if re_amount_line().is_match(line) {
            match parse_trailing_minus(line) {
                Some(amount) => acc.set_amount(amount),
                None => acc.skip(position, SkipReason::InvalidAmount(line.to_string())),
            }
        } else {
            acc.append(line);
        }
    }

    acc.finish()
}
