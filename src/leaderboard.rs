//! Derived leaderboard views.
//!
//! Nothing here is stored: both rankings are recomputed from the mirror, the
//! per-player heaps and the archive on every query, which is cheap (bounded
//! by distinct players times a sort) and keeps the views trivially consistent
//! with the last applied delta.

use std::collections::BTreeMap;

use crate::archive::ScoreArchive;
use crate::mirror::{EntityId, EntityKind, EntityMirror};
use crate::top_k::TopKHeap;
use crate::wad::Wad;

/// One row of the active-players ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivePlayer {
    pub id: EntityId,
    pub username: String,
    pub mass: Wad,
}

/// One row of the overall-score ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverallEntry {
    pub name: String,
    pub total: Wad,
}

/// Currently-alive entities with a linked username, heaviest first.
///
/// Ties keep iteration order; that order is not guaranteed stable across
/// ticks.
pub fn active_players(
    mirror: &EntityMirror,
    usernames: &BTreeMap<EntityId, String>,
) -> Vec<ActivePlayer> {
    let mut players: Vec<ActivePlayer> = mirror
        .lines()
        .flat_map(|line| mirror.entities_on_line(line))
        .filter(|entity| entity.kind == EntityKind::Alive)
        .filter_map(|entity| {
            usernames.get(&entity.id).map(|username| ActivePlayer {
                id: entity.id,
                username: username.clone(),
                mass: entity.mass,
            })
        })
        .collect();
    players.sort_by(|a, b| b.mass.cmp(&a.mass));
    players
}

/// Overall ranking: live top-K sums merged additively with the archive.
///
/// Linked players sharing a username are combined into one row (a human may
/// hold multiple identities) and pick up that username's archive entry once.
/// Unlinked players surface under a synthesized placeholder and skip the
/// archive merge entirely, since archive entries are keyed by username.
/// Zero totals are filtered out.
pub fn overall_scores(
    heaps: &BTreeMap<EntityId, TopKHeap>,
    usernames: &BTreeMap<EntityId, String>,
    archive: &ScoreArchive,
) -> Vec<OverallEntry> {
    let mut by_username: BTreeMap<String, Wad> = BTreeMap::new();
    let mut unlinked: Vec<OverallEntry> = Vec::new();

    for (id, heap) in heaps {
        if heap.is_empty() {
            continue;
        }
        match usernames.get(id) {
            Some(username) => {
                *by_username.entry(username.clone()).or_default() += heap.sum();
            }
            None => unlinked.push(OverallEntry {
                name: id.placeholder(),
                total: heap.sum(),
            }),
        }
    }

    // Archive usernames with no live scores still get a row.
    for (username, archived) in archive.iter() {
        *by_username.entry(username.to_string()).or_default() += archived;
    }

    let mut entries: Vec<OverallEntry> = by_username
        .into_iter()
        .map(|(name, total)| OverallEntry { name, total })
        .chain(unlinked)
        .filter(|entry| !entry.total.is_zero())
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries
}
