use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Issuing bank, inferred once per document from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankTag {
    Standard,
    Fnb,
    Hbz,
    Absa,
    Nedbank,
    Capitec,
    Unknown,
}

/// Fingerprints in priority order; the first hit wins when a statement
/// mentions several banks.
const FINGERPRINTS: &[(BankTag, &[&str])] = &[
    (BankTag::Standard, &["standard bank"]),
    (BankTag::Fnb, &["fnb", "first national bank"]),
    (BankTag::Hbz, &["hbz"]),
    (BankTag::Absa, &["absa"]),
    (BankTag::Nedbank, &["nedbank"]),
    (BankTag::Capitec, &["capitec"]),
];

impl BankTag {
    pub const ALL: [BankTag; 7] = [
        BankTag::Standard,
        BankTag::Fnb,
        BankTag::Hbz,
        BankTag::Absa,
        BankTag::Nedbank,
        BankTag::Capitec,
        BankTag::Unknown,
    ];

    /// Identify the issuing bank by case-insensitive substring match.
    pub fn detect(text: &str) -> BankTag {
        let lower = text.to_lowercase();
        FINGERPRINTS
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| lower.contains(n)))
            .map(|(tag, _)| *tag)
            .unwrap_or(BankTag::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BankTag::Standard => "standard",
            BankTag::Fnb => "fnb",
            BankTag::Hbz => "hbz",
            BankTag::Absa => "absa",
            BankTag::Nedbank => "nedbank",
            BankTag::Capitec => "capitec",
            BankTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BankTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "unknown bank '{0}' (expected one of: standard, fnb, hbz, absa, nedbank, capitec, unknown)"
)]
pub struct ParseBankTagError(pub String);

impl std::str::FromStr for BankTag {
    type Err = ParseBankTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        BankTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == needle)
            .ok_or(ParseBankTagError(s.to_string()))
    }
}
