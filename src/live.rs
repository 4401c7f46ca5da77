//! The live client state: one context object owning the mirror, the
//! per-player score heaps, the username links and the archive.
//!
//! Constructed once at startup and passed by reference to every consumer;
//! there is no ambient global. Deltas are applied serially from the single
//! sync transport, so queries between applies always see a fully-applied
//! prefix of the stream.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::archive::ScoreArchive;
use crate::config::GameConfig;
use crate::error::DeltaError;
use crate::leaderboard::{self, ActivePlayer, OverallEntry};
use crate::mirror::{Entity, EntityId, EntityMirror, LineId, StateDelta};
use crate::top_k::TopKHeap;
use crate::wad::Wad;

pub struct LiveState {
    config: GameConfig,
    mirror: EntityMirror,
    /// Top-K lifetime scores per entity. Entries outlive entity removal:
    /// a dead player's history still ranks.
    high_scores: BTreeMap<EntityId, TopKHeap>,
    usernames: BTreeMap<EntityId, String>,
    archive: ScoreArchive,
}

impl LiveState {
    pub fn new(config: GameConfig, archive: ScoreArchive) -> Self {
        Self {
            config,
            mirror: EntityMirror::new(config.num_lines),
            high_scores: BTreeMap::new(),
            usernames: BTreeMap::new(),
            archive,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Apply one authoritative delta.
    ///
    /// Malformed deltas are logged and dropped; the worst user-visible effect
    /// is a momentarily stale mirror, self-correcting on the next valid
    /// delta. Never panics, never escalates.
    pub fn apply(&mut self, delta: StateDelta) {
        if let Err(error) = self.apply_checked(&delta) {
            warn!(%error, ?delta, "dropping malformed state delta");
        }
    }

    fn apply_checked(&mut self, delta: &StateDelta) -> Result<(), DeltaError> {
        match delta {
            StateDelta::UsernameLinked { id, username } => {
                debug!(%id, %username, "username linked");
                self.usernames.insert(*id, username.clone());
                Ok(())
            }
            StateDelta::EntityRemoved {
                id, final_score, ..
            } => {
                if !self.mirror.contains(*id) {
                    return Err(DeltaError::UnknownEntity(*id));
                }
                // The completed life lands in the aggregator before the
                // entity leaves its line, so no query can ever see the
                // entity gone but its score missing.
                if let Some(score) = final_score {
                    self.record_score(*id, *score);
                }
                self.mirror.apply(delta)
            }
            _ => self.mirror.apply(delta),
        }
    }

    fn record_score(&mut self, id: EntityId, score: Wad) {
        let capacity = self.config.high_score_top_k;
        self.high_scores
            .entry(id)
            .or_insert_with(|| TopKHeap::new(capacity))
            .insert(score);
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.mirror.entity(id)
    }

    /// Entities on one line, left to right. Drives spatial rendering and
    /// spawn placement ("spawn to the right/left of this entity").
    pub fn entities_on_line(&self, line: LineId) -> impl Iterator<Item = &Entity> + '_ {
        self.mirror.entities_on_line(line)
    }

    pub fn mirror(&self) -> &EntityMirror {
        &self.mirror
    }

    /// Linked handle for an id, if any. Valid for removed entities too.
    pub fn username(&self, id: EntityId) -> Option<&str> {
        self.usernames.get(&id).map(String::as_str)
    }

    /// Linked handle, or the synthesized placeholder for unlinked ids.
    pub fn display_name(&self, id: EntityId) -> String {
        match self.usernames.get(&id) {
            Some(username) => username.clone(),
            None => id.placeholder(),
        }
    }

    /// Retained lifetime scores for an id, if any life ever completed.
    pub fn high_scores(&self, id: EntityId) -> Option<&TopKHeap> {
        self.high_scores.get(&id)
    }

    pub fn active_players_ranked(&self) -> Vec<ActivePlayer> {
        leaderboard::active_players(&self.mirror, &self.usernames)
    }

    pub fn overall_leaderboard_ranked(&self) -> Vec<OverallEntry> {
        leaderboard::overall_scores(&self.high_scores, &self.usernames, &self.archive)
    }
}
