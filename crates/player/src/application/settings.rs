//! Tunable rules and timings of the reducer

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::infrastructure::websocket::DEFAULT_WS_PATH;

pub const PEEK_HIDE_MS: u64 = 2_000;
pub const REVEAL_PACING_MS: u64 = 800;

/// Which second click proposes a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapProposalRule {
    /// Only neighbouring slots may be exchanged
    Adjacent,
    /// Any two distinct slots may be exchanged
    #[default]
    Unconstrained,
}

impl SwapProposalRule {
    pub fn allows(&self, slot_a: usize, slot_b: usize) -> bool {
        match self {
            SwapProposalRule::Adjacent => slot_a.abs_diff(slot_b) == 1,
            SwapProposalRule::Unconstrained => slot_a != slot_b,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapProposalRule::Adjacent => "adjacent",
            SwapProposalRule::Unconstrained => "unconstrained",
        }
    }
}

impl fmt::Display for SwapProposalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapProposalRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent" => Ok(SwapProposalRule::Adjacent),
            "unconstrained" | "any" => Ok(SwapProposalRule::Unconstrained),
            _ => Err(ConfigError::invalid(
                "TABLEAU_SWAP_RULE",
                s,
                "expected `adjacent` or `unconstrained`",
            )),
        }
    }
}

/// Delays of the reducer's follow-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducerTiming {
    /// How long a peeked card stays visible
    pub peek_hide: Duration,
    /// Per-card pacing of the final reveal
    pub reveal_pacing: Duration,
}

impl Default for ReducerTiming {
    fn default() -> Self {
        Self {
            peek_hide: Duration::from_millis(PEEK_HIDE_MS),
            reveal_pacing: Duration::from_millis(REVEAL_PACING_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerSettings {
    pub swap_rule: SwapProposalRule,
    pub timing: ReducerTiming,
    /// Connection path opened by create and join
    pub ws_path: String,
}

impl Default for ReducerSettings {
    fn default() -> Self {
        Self {
            swap_rule: SwapProposalRule::default(),
            timing: ReducerTiming::default(),
            ws_path: DEFAULT_WS_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_rule_requires_neighbours() {
        let rule = SwapProposalRule::Adjacent;
        assert!(rule.allows(3, 4));
        assert!(rule.allows(4, 3));
        assert!(!rule.allows(3, 5));
        assert!(!rule.allows(3, 3));
    }

    #[test]
    fn unconstrained_rule_takes_any_distinct_pair() {
        let rule = SwapProposalRule::Unconstrained;
        assert!(rule.allows(0, 14));
        assert!(!rule.allows(7, 7));
    }

    #[test]
    fn rule_parses_from_config_values() {
        assert_eq!(
            " Adjacent ".parse::<SwapProposalRule>().expect("known rule"),
            SwapProposalRule::Adjacent
        );
        assert!("diagonal".parse::<SwapProposalRule>().is_err());
        assert_eq!(SwapProposalRule::default(), SwapProposalRule::Unconstrained);
    }
}
