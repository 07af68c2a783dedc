//! The fixed vocabulary of panel test codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use super::ModelError;

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// A test code in a blood-test panel.
///
/// The canonical spelling is the lowercase `as_str` form. Only that spelling is
/// accepted by [`FromStr`]; older data goes through [`TestCode::from_legacy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCode {
    Igg,
    Iga,
    Igm,
    Igg1,
    Igg2,
    Igg3,
    Igg4,
    TetanusToxoid,
    Prp,
    Pneumococcus,
    AntiA,
    AntiB,
}

impl TestCode {
    /// Every code, in panel entry order.
    pub const ALL: [TestCode; 12] = [
        TestCode::Igg,
        TestCode::Iga,
        TestCode::Igm,
        TestCode::Igg1,
        TestCode::Igg2,
        TestCode::Igg3,
        TestCode::Igg4,
        TestCode::TetanusToxoid,
        TestCode::Prp,
        TestCode::Pneumococcus,
        TestCode::AntiA,
        TestCode::AntiB,
    ];

    /// Canonical storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCode::Igg => "igg",
            TestCode::Iga => "iga",
            TestCode::Igm => "igm",
            TestCode::Igg1 => "igg1",
            TestCode::Igg2 => "igg2",
            TestCode::Igg3 => "igg3",
            TestCode::Igg4 => "igg4",
            TestCode::TetanusToxoid => "tetanustoxoid",
            TestCode::Prp => "prp",
            TestCode::Pneumococcus => "pneumococcus",
            TestCode::AntiA => "antia",
            TestCode::AntiB => "antib",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TestCode::Igg => "IgG",
            TestCode::Iga => "IgA",
            TestCode::Igm => "IgM",
            TestCode::Igg1 => "IgG1",
            TestCode::Igg2 => "IgG2",
            TestCode::Igg3 => "IgG3",
            TestCode::Igg4 => "IgG4",
            TestCode::TetanusToxoid => "Tetanus Toxoid",
            TestCode::Prp => "PRP (HIB)",
            TestCode::Pneumococcus => "Pneumococcus",
            TestCode::AntiA => "Isohemagglutinin Titer Anti A",
            TestCode::AntiB => "Isohemagglutinin Titer Anti B",
        }
    }

    /// Measurement unit, `None` for titers.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            TestCode::Igg
            | TestCode::Iga
            | TestCode::Igm
            | TestCode::Igg1
            | TestCode::Igg2
            | TestCode::Igg3
            | TestCode::Igg4 => Some("mg/dl"),
            TestCode::TetanusToxoid => Some("IU/ml"),
            TestCode::Prp | TestCode::Pneumococcus => Some("ng/ml"),
            TestCode::AntiA | TestCode::AntiB => None,
        }
    }

    /// Map a key from older data (mixed casing, the `pheumococcus` misspelling)
    /// onto the canonical code. Migration use only.
    pub fn from_legacy(raw: &str) -> Result<Self, ModelError> {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "pheumococcus" => Ok(TestCode::Pneumococcus),
            other => other.parse(),
        }
    }

    /// Closest canonical code to an unknown key.
    pub fn suggest(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        TestCode::ALL
            .iter()
            .map(|code| (*code, jaro_winkler(&lower, code.as_str())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(code, _)| code)
    }
}

impl FromStr for TestCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestCode::ALL
            .iter()
            .find(|code| code.as_str() == s)
            .copied()
            .ok_or_else(|| ModelError::UnknownTestCode {
                code: s.to_string(),
                suggestion: TestCode::suggest(s),
            })
    }
}

impl fmt::Display for TestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_round_trip() {
        for code in TestCode::ALL {
            assert_eq!(code.as_str().parse::<TestCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_strict_parse_rejects_variants() {
        assert!("igG1".parse::<TestCode>().is_err());
        assert!("IGG".parse::<TestCode>().is_err());
        assert!("pheumococcus".parse::<TestCode>().is_err());
        assert!(" igg".parse::<TestCode>().is_err());
    }

    #[test]
    fn test_legacy_normalization() {
        assert_eq!(TestCode::from_legacy("igG1").unwrap(), TestCode::Igg1);
        assert_eq!(TestCode::from_legacy("igA").unwrap(), TestCode::Iga);
        assert_eq!(TestCode::from_legacy("antiA").unwrap(), TestCode::AntiA);
        assert_eq!(TestCode::from_legacy("tetanusToxoid").unwrap(), TestCode::TetanusToxoid);
        assert_eq!(TestCode::from_legacy("pheumococcus").unwrap(), TestCode::Pneumococcus);
        assert!(TestCode::from_legacy("zzz").is_err());
    }

    #[test]
    fn test_suggestion() {
        assert_eq!(TestCode::suggest("pheumococcus"), Some(TestCode::Pneumococcus));
        assert_eq!(TestCode::suggest("tetanus"), Some(TestCode::TetanusToxoid));
        assert_eq!(TestCode::suggest("zzz"), None);

        match "pneumococus".parse::<TestCode>() {
            Err(ModelError::UnknownTestCode { suggestion, .. }) => {
                assert_eq!(suggestion, Some(TestCode::Pneumococcus));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_serde_uses_canonical_keys() {
        let json = serde_json::to_string(&TestCode::TetanusToxoid).unwrap();
        assert_eq!(json, "\"tetanustoxoid\"");
        let code: TestCode = serde_json::from_str("\"antib\"").unwrap();
        assert_eq!(code, TestCode::AntiB);
    }
}
