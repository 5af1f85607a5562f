//! Property tests for the paddle clamp, the tick's catch accounting and the
//! one-timer-per-process guarantee.

use std::num::NonZeroU32;

use paddle_catch::sim::engine::Engine;
use paddle_catch::sim::{FallingObject, Key, KeyEvent, Task, is_caught, is_off_board, tick};
use paddle_catch::{BoardConfig, Game, Setting};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![Just(Key::Left), Just(Key::Right)]
}

fn object_strategy() -> impl Strategy<Value = (i32, i32)> {
    (0..480i32, 0..600i32)
}

/// Operations against the spawn process of a running game
#[derive(Debug, Clone)]
enum SpawnOp {
    SetFrequency(Option<u32>),
    SetDuration(Option<u32>),
    Advance(u64),
}

fn spawn_op_strategy() -> impl Strategy<Value = SpawnOp> {
    prop_oneof![
        prop::option::of(1..5u32).prop_map(SpawnOp::SetFrequency),
        prop::option::of(1..20u32).prop_map(SpawnOp::SetDuration),
        (0..5000u64).prop_map(SpawnOp::Advance),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn paddle_stays_on_board(
        speed in 1..700u32,
        presses in prop::collection::vec((key_strategy(), 0..200u64), 1..100),
    ) {
        let board = BoardConfig::default();
        let mut engine = Engine::new(board, 0).unwrap();
        engine.set_paddle_speed(NonZeroU32::new(speed));

        let mut at_ms = 0;
        for (key, gap) in presses {
            at_ms += gap;
            engine.handle_key(KeyEvent { at_ms, key });
            let x = engine.player_x().get();
            prop_assert!(x >= 0 && x <= board.max_player_x());
        }
    }

    #[test]
    fn tick_scores_exactly_the_caught_objects(
        positions in prop::collection::vec(object_strategy(), 0..40),
        paddle_x in 0..=400i32,
        speed in prop::option::of(1..60u32),
    ) {
        let board = BoardConfig::default();
        let mut objects: Vec<FallingObject> = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| FallingObject { id: i as u32, x, y })
            .collect();

        let step = speed.map_or(0, |s| s as i32);
        let moved: Vec<FallingObject> = objects
            .iter()
            .map(|o| FallingObject { y: o.y + step, ..*o })
            .collect();
        let expected_caught = moved.iter().filter(|o| is_caught(o, paddle_x, &board)).count() as u32;
        let expected_missed = moved
            .iter()
            .filter(|o| !is_caught(o, paddle_x, &board) && is_off_board(o, &board))
            .count() as u32;
        let expected_live: Vec<FallingObject> = moved
            .iter()
            .filter(|o| !is_caught(o, paddle_x, &board) && !is_off_board(o, &board))
            .copied()
            .collect();

        let outcome = tick(&mut objects, paddle_x, speed.and_then(NonZeroU32::new), &board);
        prop_assert_eq!(outcome.caught, expected_caught);
        prop_assert_eq!(outcome.missed, expected_missed);
        prop_assert_eq!(objects, expected_live);
    }

    #[test]
    fn spawn_process_never_overlaps(ops in prop::collection::vec(spawn_op_strategy(), 1..40)) {
        let mut game = Game::without_input(BoardConfig::default(), 1).unwrap();
        let nz = |v: Option<u32>| -> Setting { v.and_then(NonZeroU32::new) };

        for op in ops {
            match op {
                SpawnOp::SetFrequency(v) => game.set_spawn_frequency(nz(v)),
                SpawnOp::SetDuration(v) => game.set_round_duration(nz(v)),
                SpawnOp::Advance(ms) => game.advance(ms),
            }
            let running = game.engine().is_running();
            let expected = usize::from(running && game.settings().spawn_frequency().is_some());
            prop_assert_eq!(game.scheduler().count(Task::Spawn), expected);
            prop_assert!(game.scheduler().count(Task::Countdown) <= 1);
            prop_assert_eq!(game.scheduler().count(Task::Physics), usize::from(running));
        }
    }
}
