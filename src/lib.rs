//! Client-side live game-state mirror and score aggregation for the
//! linematch on-chain game.
//!
//! The sync transport feeds authoritative [`StateDelta`]s into a
//! [`LiveState`]; rendering and spawn-placement code query the mirrored
//! lines, and the leaderboard views are derived on demand from the bounded
//! per-player [`TopKHeap`]s merged with the immutable [`ScoreArchive`].

pub mod archive;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod live;
pub mod mirror;
pub mod top_k;
pub mod wad;

pub use archive::ScoreArchive;
pub use config::GameConfig;
pub use error::{DeltaError, WadError};
pub use leaderboard::{ActivePlayer, OverallEntry};
pub use live::LiveState;
pub use mirror::{Entity, EntityId, EntityKind, EntityMirror, LineId, RemovalCause, StateDelta};
pub use top_k::TopKHeap;
pub use wad::Wad;
