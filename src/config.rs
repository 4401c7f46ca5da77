//! Game configuration relevant to the client mirror.
//!
//! The authoritative values live in on-chain game configuration; the sync
//! layer reads them once and hands them to [`LiveState`](crate::LiveState)
//! at construction.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HIGH_SCORE_TOP_K: usize = 8;
pub const DEFAULT_NUM_LINES: u32 = 10;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// How many of a player's largest lifetime scores count toward the
    /// overall leaderboard. Zero is valid and yields constant-zero sums.
    #[serde(default = "default_top_k")]
    pub high_score_top_k: usize,
    /// Number of lanes in the world. Deltas naming a line at or beyond this
    /// bound are malformed.
    #[serde(default = "default_num_lines")]
    pub num_lines: u32,
}

fn default_top_k() -> usize {
    DEFAULT_HIGH_SCORE_TOP_K
}

fn default_num_lines() -> u32 {
    DEFAULT_NUM_LINES
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            high_score_top_k: DEFAULT_HIGH_SCORE_TOP_K,
            num_lines: DEFAULT_NUM_LINES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GameConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.high_score_top_k, DEFAULT_HIGH_SCORE_TOP_K);
        assert_eq!(config.num_lines, DEFAULT_NUM_LINES);

        let config: GameConfig =
            serde_json::from_str(r#"{"high_score_top_k": 3}"#).expect("parse");
        assert_eq!(config.high_score_top_k, 3);
        assert_eq!(config.num_lines, DEFAULT_NUM_LINES);
    }
}
