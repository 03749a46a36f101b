//! Property tests over arbitrary operation sequences.

use momentum_core::{
    Clock, ManualClock, MemoryStore, Outcome, Session, SessionState, SessionStore,
    LOCK_DURATION_MS,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Up(usize),
    Down(usize),
    Remove(usize),
    Start,
    Complete,
    Check,
    Reset,
    Advance(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z ]{0,6}".prop_map(Op::Add),
        (0usize..5).prop_map(Op::Up),
        (0usize..5).prop_map(Op::Down),
        (0usize..5).prop_map(Op::Remove),
        Just(Op::Start),
        Just(Op::Complete),
        Just(Op::Check),
        Just(Op::Reset),
        (0u64..=LOCK_DURATION_MS).prop_map(Op::Advance),
    ]
}

fn apply(session: &mut Session<MemoryStore, ManualClock>, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Add(title) => session.add_habit(title),
        Op::Up(i) => session.move_habit_up(*i),
        Op::Down(i) => session.move_habit_down(*i),
        Op::Remove(i) => session.remove_habit(*i),
        Op::Start => session.start_focus(),
        Op::Complete => session.complete_current(),
        Op::Check => session.check_expiry(),
        Op::Reset => session.force_reset_and_advance_streak(),
        Op::Advance(ms) => {
            session.clock().advance_ms(*ms);
            return None;
        }
    };
    Some(outcome.unwrap())
}

fn reload(session: &Session<MemoryStore, ManualClock>) -> SessionState {
    SessionStore::new(session.store().medium().clone()).load_state()
}

proptest! {
    #[test]
    fn invariants_hold_over_any_sequence(ops in prop::collection::vec(op(), 0..40)) {
        let clock = ManualClock::new(1_000_000);
        let mut session = Session::open(MemoryStore::new(), clock.clone());
        session.set_username("ada").unwrap();

        for op in &ops {
            let streak_before = session.state().momentum_streak();
            let before = session.state().clone();
            let outcome = apply(&mut session, op);
            let state = session.state();

            // Streak only moves on reset, and only upward by one.
            match op {
                Op::Reset => prop_assert_eq!(state.momentum_streak(), streak_before + 1),
                _ => prop_assert_eq!(state.momentum_streak(), streak_before),
            }

            prop_assert!(state.index() <= state.habits().len());
            prop_assert_eq!(
                session.is_locked(),
                clock.now_ms() < state.lock_until()
            );

            if let Some(Outcome::Rejected(_)) = outcome {
                prop_assert_eq!(state, &before);
            }

            // Whatever is in memory is what a restart would load.
            prop_assert_eq!(&reload(&session), state);
        }
    }

    #[test]
    fn check_expiry_is_idempotent(ops in prop::collection::vec(op(), 0..30)) {
        let clock = ManualClock::new(1_000_000);
        let mut session = Session::open(MemoryStore::new(), clock.clone());
        session.set_username("ada").unwrap();
        for op in &ops {
            apply(&mut session, op);
        }

        session.check_expiry().unwrap();
        let once = session.state().clone();
        let again = session.check_expiry().unwrap();

        prop_assert!(!again.is_applied());
        prop_assert_eq!(session.state(), &once);
    }

    #[test]
    fn boundary_moves_never_change_order(titles in prop::collection::vec("[a-z]{1,4}", 1..6)) {
        let mut session = Session::open(MemoryStore::new(), ManualClock::new(0));
        session.set_username("ada").unwrap();
        for title in &titles {
            session.add_habit(title).unwrap();
        }
        let before = session.state().clone();
        let last = titles.len() - 1;

        prop_assert!(!session.move_habit_up(0).unwrap().is_applied());
        prop_assert!(!session.move_habit_down(last).unwrap().is_applied());
        prop_assert_eq!(session.state(), &before);
    }
}
