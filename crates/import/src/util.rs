use ledgerscan_core::Money;

pub(crate) use ledgerscan_core::re;

/// Money token as printed in statement text: `1,234.56`, `1 234.56` or `1234.56`.
macro_rules! amount_pattern {
    () => {
        r"(?:\d{1,3}(?:[ ,]\d{3})*\.\d{2}|\d+\.\d{2})"
    };
}

pub(crate) use amount_pattern;

re!(re_balance_line, r"^\d{1,3}(?:,\d{3})+\.\d{2}$");

/// A bare running balance: grouped thousands, two decimals, no sign marker.
pub(crate) fn is_balance_line(line: &str) -> bool {
    re_balance_line().is_match(line)
}

/// Parse an amount token with an optional trailing `-` debit marker. Anything
/// without the marker is a credit.
pub(crate) fn parse_trailing_minus(token: &str) -> Option<Money> {
    let token = token.trim();
    let magnitude = Money::parse_magnitude(token)?;
    if token.ends_with('-') {
        Some(magnitude.debit())
    } else {
        Some(magnitude.credit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    re!(re_amount_token, concat!("^", amount_pattern!(), "$"));

    #[test]
    fn balance_lines_need_grouped_thousands() {
        assert!(is_balance_line("115,633.09"));
        assert!(is_balance_line("1,000,000.00"));
        assert!(!is_balance_line("150.00"));
        assert!(!is_balance_line("1,500.00-"));
        assert!(!is_balance_line("11,5633.09"));
    }

    #[test]
    fn amount_pattern_accepts_statement_forms() {
        for token in ["1,234.56", "1 234.56", "1234.56", "0.15"] {
            assert!(re_amount_token().is_match(token), "{token}");
        }
        for token in ["1,23.45", "12.5", "abc"] {
            assert!(!re_amount_token().is_match(token), "{token}");
        }
    }

    #[test]
    fn trailing_minus_marks_debit() {
        assert_eq!(parse_trailing_minus("150.00-"), Some(Money::from_cents(-15000)));
        assert_eq!(parse_trailing_minus("1,500.00"), Some(Money::from_cents(150000)));
        assert_eq!(parse_trailing_minus("-"), None);
    }
}
