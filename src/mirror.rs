//! Live mirror of the authoritative world state.
//!
//! Entities live in a central arena keyed by [`EntityId`]; each line holds an
//! ordered sequence of ids only, never owning references, so there are no
//! cycles between lines and entities. Deltas from the sync transport are
//! applied serially; a malformed delta leaves the mirror untouched so a
//! single bad frame can never poison the view.

use std::collections::BTreeMap;

use alloy_primitives::U160;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::DeltaError;
use crate::wad::Wad;

/// Discrete lane index.
pub type LineId = u32;

/// Opaque entity identity, derived from a 160-bit address in the source
/// domain. Stable for the lifetime of an entity and never reused, which is
/// what lets high scores and usernames outlive the entity itself.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(U160);

impl EntityId {
    pub const fn new(raw: U160) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> U160 {
        self.0
    }

    /// Display handle for entities with no linked username: `UNKNOWN ` plus
    /// the leading digits of the decimal id.
    pub fn placeholder(self) -> String {
        let decimal = self.0.to_string();
        let prefix = &decimal[..decimal.len().min(4)];
        format!("UNKNOWN {prefix}")
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(U160::from(raw))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A player-controlled entity.
    Alive,
    Food,
    Wall,
    Power,
}

/// Why the authority removed an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalCause {
    /// Eaten by another entity.
    Consumed,
    Despawned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub mass: Wad,
    pub line: LineId,
}

/// One authoritative state update. One case per delta kind, each carrying
/// exactly the fields that kind requires; the mirror matches exhaustively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateDelta {
    EntityCreated {
        id: EntityId,
        kind: EntityKind,
        line: LineId,
        mass: Wad,
        /// Entity this one spawns immediately to the left of; `None` appends
        /// at the right end of the line.
        right_neighbor: Option<EntityId>,
    },
    MassChanged {
        id: EntityId,
        mass: Wad,
    },
    LineChanged {
        id: EntityId,
        line: LineId,
        right_neighbor: Option<EntityId>,
    },
    EntityRemoved {
        id: EntityId,
        cause: RemovalCause,
        /// Total mass consumed during the completed life, when the removal
        /// finalizes one.
        final_score: Option<Wad>,
    },
    UsernameLinked {
        id: EntityId,
        username: String,
    },
}

/// Client-held replica of entity and line state.
#[derive(Clone, Debug)]
pub struct EntityMirror {
    entities: BTreeMap<EntityId, Entity>,
    lines: BTreeMap<LineId, Vec<EntityId>>,
    num_lines: u32,
}

impl EntityMirror {
    pub fn new(num_lines: u32) -> Self {
        Self {
            entities: BTreeMap::new(),
            lines: BTreeMap::new(),
            num_lines,
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of entities currently alive in the mirror.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities on one line, left to right.
    pub fn entities_on_line(&self, line: LineId) -> impl Iterator<Item = &Entity> + '_ {
        self.lines
            .get(&line)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.get(id))
    }

    /// Currently occupied lines, ascending.
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.keys().copied()
    }

    /// Patch the mirror with one authoritative delta.
    ///
    /// On error the mirror is bit-for-bit unchanged; callers log and drop.
    pub fn apply(&mut self, delta: &StateDelta) -> Result<(), DeltaError> {
        match delta {
            StateDelta::EntityCreated {
                id,
                kind,
                line,
                mass,
                right_neighbor,
            } => self.create(*id, *kind, *line, *mass, *right_neighbor),
            StateDelta::MassChanged { id, mass } => {
                let entity = self
                    .entities
                    .get_mut(id)
                    .ok_or(DeltaError::UnknownEntity(*id))?;
                entity.mass = *mass;
                Ok(())
            }
            StateDelta::LineChanged {
                id,
                line,
                right_neighbor,
            } => self.change_line(*id, *line, *right_neighbor),
            StateDelta::EntityRemoved { id, .. } => self.remove(*id),
            // Identity metadata lives outside the mirror; see `LiveState`.
            StateDelta::UsernameLinked { .. } => Ok(()),
        }
    }

    fn create(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        line: LineId,
        mass: Wad,
        right_neighbor: Option<EntityId>,
    ) -> Result<(), DeltaError> {
        if self.entities.contains_key(&id) {
            return Err(DeltaError::DuplicateEntity(id));
        }
        self.check_line(id, line)?;
        let slot = self.placement_index(id, line, right_neighbor)?;

        self.entities.insert(id, Entity { id, kind, mass, line });
        let sequence = self.lines.entry(line).or_default();
        match slot {
            Some(index) => sequence.insert(index, id),
            None => sequence.push(id),
        }
        Ok(())
    }

    fn change_line(
        &mut self,
        id: EntityId,
        line: LineId,
        right_neighbor: Option<EntityId>,
    ) -> Result<(), DeltaError> {
        if !self.entities.contains_key(&id) {
            return Err(DeltaError::UnknownEntity(id));
        }
        self.check_line(id, line)?;
        self.placement_index(id, line, right_neighbor)?;

        // Validated; now move. The neighbor index is recomputed after the
        // detach because a same-line move shifts positions.
        self.detach_from_line(id);
        let sequence = self.lines.entry(line).or_default();
        let slot = right_neighbor.and_then(|n| sequence.iter().position(|&e| e == n));
        match slot {
            Some(index) => sequence.insert(index, id),
            None => sequence.push(id),
        }
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.line = line;
        }
        Ok(())
    }

    fn remove(&mut self, id: EntityId) -> Result<(), DeltaError> {
        if !self.entities.contains_key(&id) {
            return Err(DeltaError::UnknownEntity(id));
        }
        self.detach_from_line(id);
        self.entities.remove(&id);
        Ok(())
    }

    fn check_line(&self, id: EntityId, line: LineId) -> Result<(), DeltaError> {
        if line >= self.num_lines {
            return Err(DeltaError::LineOutOfRange { id, line });
        }
        Ok(())
    }

    /// Index the entity should occupy on `line` (left of `right_neighbor`),
    /// or `None` to append. Errors without mutating.
    fn placement_index(
        &self,
        id: EntityId,
        line: LineId,
        right_neighbor: Option<EntityId>,
    ) -> Result<Option<usize>, DeltaError> {
        let Some(neighbor) = right_neighbor else {
            return Ok(None);
        };
        if neighbor == id {
            return Err(DeltaError::SelfNeighbor(id));
        }
        let index = self
            .lines
            .get(&line)
            .and_then(|sequence| sequence.iter().position(|&e| e == neighbor))
            .ok_or(DeltaError::UnknownNeighbor { id, neighbor })?;
        Ok(Some(index))
    }

    fn detach_from_line(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        if let Some(sequence) = self.lines.get_mut(&entity.line) {
            sequence.retain(|&e| e != id);
            if sequence.is_empty() {
                self.lines.remove(&entity.line);
            }
        }
    }

    /// Panics if any line references an id without a matching arena record,
    /// or any entity is missing from (or misfiled in) its line. Test aid.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (&line, sequence) in &self.lines {
            for id in sequence {
                let entity = self.entities.get(id).expect("dangling id in line sequence");
                assert_eq!(entity.line, line, "entity filed on the wrong line");
            }
        }
        for entity in self.entities.values() {
            let on_line = self
                .lines
                .get(&entity.line)
                .is_some_and(|sequence| sequence.contains(&entity.id));
            assert!(on_line, "entity missing from its line sequence");
        }
    }
}
