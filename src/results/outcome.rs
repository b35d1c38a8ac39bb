// Outcome vocabulary for DejaGnu result lines
//
// Declaration order is the canonical display order; `Ord` is derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single DejaGnu test outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Fail,
    Pass,
    Xfail,
    Kfail,
    Xpass,
    Kpass,
    Untested,
    Unresolved,
    Unsupported,
}

impl Outcome {
    /// Every outcome, in canonical order
    pub const ALL: [Outcome; 9] = [
        Outcome::Fail,
        Outcome::Pass,
        Outcome::Xfail,
        Outcome::Kfail,
        Outcome::Xpass,
        Outcome::Kpass,
        Outcome::Untested,
        Outcome::Unresolved,
        Outcome::Unsupported,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Fail => "FAIL",
            Outcome::Pass => "PASS",
            Outcome::Xfail => "XFAIL",
            Outcome::Kfail => "KFAIL",
            Outcome::Xpass => "XPASS",
            Outcome::Kpass => "KPASS",
            Outcome::Untested => "UNTESTED",
            Outcome::Unresolved => "UNRESOLVED",
            Outcome::Unsupported => "UNSUPPORTED",
        }
    }

    /// Split a result line into its outcome and the remainder after `"<OUTCOME>: "`.
    ///
    /// Outcomes are tried in canonical order and the first match wins.
    /// Returns `None` for anything that is not a result line.
    pub fn split_result_line(line: &str) -> Option<(Outcome, &str)> {
        Self::ALL.iter().find_map(|&outcome| {
            line.strip_prefix(outcome.as_str())
                .and_then(|rest| rest.strip_prefix(": "))
                .map(|rest| (outcome, rest))
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("Unknown outcome: {}", s))
    }
}
