//! Historical score archive.
//!
//! Scores earned before the mirror's observation window ship as a static
//! JSON object (`username -> whole-unit score`). The archive is loaded once
//! at startup, merged additively into the overall leaderboard, and never
//! touched by live events.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::wad::Wad;

/// Immutable `username -> score` snapshot.
#[derive(Clone, Debug, Default)]
pub struct ScoreArchive {
    scores: BTreeMap<String, Wad>,
}

impl ScoreArchive {
    /// Empty archive, for deployments with no history to carry over.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from whole-unit scores keyed by username.
    pub fn from_map(scores: BTreeMap<String, u64>) -> Self {
        Self {
            scores: scores
                .into_iter()
                .map(|(username, units)| (username, Wad::from_units(units)))
                .collect(),
        }
    }

    /// Parse the archive payload: a JSON object of whole-unit integers.
    pub fn from_json_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        let scores: BTreeMap<String, u64> =
            serde_json::from_slice(bytes).context("malformed score archive payload")?;
        Ok(Self::from_map(scores))
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read score archive {}", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    /// Archived score for a username; zero when unknown.
    pub fn lookup(&self, username: &str) -> Wad {
        self.scores.get(username).copied().unwrap_or(Wad::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Wad)> + '_ {
        self.scores
            .iter()
            .map(|(username, score)| (username.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_zero_for_unknown_usernames() {
        let archive = ScoreArchive::from_map(BTreeMap::from([("alice".to_string(), 100)]));
        assert_eq!(archive.lookup("alice"), Wad::from_units(100));
        assert_eq!(archive.lookup("bob"), Wad::ZERO);
    }

    #[test]
    fn parses_json_object_payload() {
        let archive = ScoreArchive::from_json_slice(br#"{"alice": 100, "carol": 7}"#)
            .expect("payload must parse");
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.lookup("carol"), Wad::from_units(7));
    }

    #[test]
    fn rejects_non_object_payloads() {
        assert!(ScoreArchive::from_json_slice(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("archive.json");
        fs::write(&path, br#"{"alice": 42}"#).expect("write");
        let archive = ScoreArchive::from_path(&path).expect("load");
        assert_eq!(archive.lookup("alice"), Wad::from_units(42));
    }
}
