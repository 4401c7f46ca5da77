//! End-to-end exercise of the delta stream -> mirror -> leaderboard path,
//! matching how the sync layer drives the library in production.

use std::collections::BTreeMap;

use anyhow::Result;
use linematch_client::{
    EntityId, EntityKind, GameConfig, LiveState, RemovalCause, ScoreArchive, StateDelta, Wad,
};

fn spawn(id: u64, line: u32, mass: u64, right_neighbor: Option<u64>) -> StateDelta {
    StateDelta::EntityCreated {
        id: id.into(),
        kind: EntityKind::Alive,
        line,
        mass: Wad::from_units(mass),
        right_neighbor: right_neighbor.map(EntityId::from),
    }
}

fn food(id: u64, line: u32) -> StateDelta {
    StateDelta::EntityCreated {
        id: id.into(),
        kind: EntityKind::Food,
        line,
        mass: Wad::from_units(1),
        right_neighbor: None,
    }
}

fn die(id: u64, final_score: u64) -> StateDelta {
    StateDelta::EntityRemoved {
        id: id.into(),
        cause: RemovalCause::Consumed,
        final_score: Some(Wad::from_units(final_score)),
    }
}

fn link(id: u64, username: &str) -> StateDelta {
    StateDelta::UsernameLinked {
        id: id.into(),
        username: username.to_string(),
    }
}

#[test]
fn full_session_produces_consistent_views() -> Result<()> {
    let config = GameConfig {
        high_score_top_k: 3,
        num_lines: 4,
    };
    let archive = ScoreArchive::from_map(BTreeMap::from([
        ("alice".to_string(), 100),
        ("dave".to_string(), 75),
    ]));
    let mut live = LiveState::new(config, archive);

    live.apply(link(1, "alice"));
    live.apply(link(2, "bob"));

    live.apply(spawn(1, 0, 10, None));
    live.apply(food(100, 0));
    live.apply(spawn(2, 1, 10, None));

    // Alice grows, dies, respawns and dies again; only completed lives score.
    live.apply(StateDelta::MassChanged {
        id: 1u64.into(),
        mass: Wad::from_units(35),
    });
    live.apply(die(1, 35));
    live.apply(spawn(1, 2, 10, None));
    live.apply(die(1, 15));

    // Bob is still alive with no completed life.
    let active = live.active_players_ranked();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].username, "bob");

    let overall = live.overall_leaderboard_ranked();
    let rows: Vec<(&str, u64)> = overall
        .iter()
        .map(|entry| (entry.name.as_str(), entry.total.floor_units().to::<u64>()))
        .collect();
    // alice: 35 + 15 live + 100 archived; dave: archive only; bob: nothing.
    assert_eq!(rows, [("alice", 150), ("dave", 75)]);

    Ok(())
}

#[test]
fn spawn_placement_neighbors_are_queryable() -> Result<()> {
    let mut live = LiveState::new(
        GameConfig {
            high_score_top_k: 3,
            num_lines: 2,
        },
        ScoreArchive::empty(),
    );

    live.apply(spawn(1, 0, 10, None));
    live.apply(food(50, 0));
    // A new player spawns immediately left of the food pellet.
    live.apply(spawn(2, 0, 10, Some(50)));

    let order: Vec<EntityId> = live.entities_on_line(0).map(|e| e.id).collect();
    let expected: Vec<EntityId> = [1u64, 2, 50].into_iter().map(EntityId::from).collect();
    assert_eq!(order, expected);

    // Neighbor lookup for "eject right of entity 2".
    let right_of_2 = order
        .iter()
        .skip_while(|&&id| id != EntityId::from(2u64))
        .nth(1)
        .copied();
    assert_eq!(right_of_2, Some(EntityId::from(50u64)));

    Ok(())
}

#[test]
fn malformed_deltas_do_not_disturb_the_session() -> Result<()> {
    let mut live = LiveState::new(GameConfig::default(), ScoreArchive::empty());

    live.apply(link(1, "alice"));
    live.apply(spawn(1, 0, 10, None));

    // Out-of-range line, unknown neighbor, duplicate create, unknown removal:
    // all dropped, none fatal.
    live.apply(spawn(2, 999, 10, None));
    live.apply(spawn(3, 0, 10, Some(77)));
    live.apply(spawn(1, 0, 10, None));
    live.apply(die(42, 1_000));

    assert_eq!(live.mirror().len(), 1);
    assert!(live.overall_leaderboard_ranked().is_empty());
    assert_eq!(live.active_players_ranked().len(), 1);

    // The stream keeps working after the bad frames.
    live.apply(die(1, 20));
    assert_eq!(
        live.high_scores(1u64.into()).map(|heap| heap.sum()),
        Some(Wad::from_units(20))
    );

    Ok(())
}

#[test]
fn delta_log_round_trips_as_jsonl() -> Result<()> {
    let deltas = vec![
        link(1, "alice"),
        spawn(1, 0, 10, None),
        die(1, 30),
    ];
    let log: String = deltas
        .iter()
        .map(|delta| serde_json::to_string(delta).map(|line| line + "\n"))
        .collect::<Result<String, _>>()?;

    let mut live = LiveState::new(GameConfig::default(), ScoreArchive::empty());
    for line in log.lines() {
        let delta: StateDelta = serde_json::from_str(line)?;
        live.apply(delta);
    }

    let overall = live.overall_leaderboard_ranked();
    assert_eq!(overall.len(), 1);
    assert_eq!(overall[0].name, "alice");
    assert_eq!(overall[0].total, Wad::from_units(30));

    Ok(())
}
