use rand::{Rng, SeedableRng, rngs::StdRng};
use ten_thousand::{
    Action,
    dice::Scored,
    environment::{EnvironmentConfig, EpisodeState, GameEnvironment, TurnState},
};

fn bust(_: &[u8]) -> Scored {
    Scored::new(0, Vec::new())
}

#[test]
fn bust_from_fresh_turn_moves_to_next_turn() {
    let mut env = GameEnvironment::new(bust, EnvironmentConfig::default(), Some(1));

    let outcome = env.step(Action::Roll);

    assert!(outcome.reward <= 0.0);
    assert!(!outcome.episode_done);
    assert_eq!(
        *env.state(),
        EpisodeState {
            turn_number: 2,
            total_score: 0,
            turn: TurnState::new(6, 0),
        }
    );
}

#[test]
fn bust_always_clears_turn_state() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut env = GameEnvironment::new(bust, EnvironmentConfig::default(), Some(2));

    for _ in 0..200 {
        let before = EpisodeState {
            turn_number: rng.random_range(1..50),
            total_score: rng.random_range(0..200) * 50,
            turn: TurnState::new(rng.random_range(0..=6), rng.random_range(0..40) * 50),
        };
        env.set_state(before);

        let outcome = env.step(Action::Roll);

        assert!(!outcome.episode_done);
        assert!(outcome.reward <= 0.0);
        assert_eq!(env.state().turn, TurnState::new(6, 0));
        assert_eq!(env.state().turn_number, before.turn_number + 1);
        assert_eq!(env.state().total_score, before.total_score);
    }
}

#[test]
fn standing_past_target_resets_episode() {
    let mut env = GameEnvironment::standard(Some(3));
    env.set_state(EpisodeState {
        turn_number: 12,
        total_score: 9800,
        turn: TurnState::new(3, 500),
    });

    let outcome = env.step(Action::Stand);

    assert!(outcome.episode_done);
    assert!(outcome.reward > 0.0);
    assert_eq!(*env.state(), EpisodeState::initial());
}

#[test]
fn stand_only_episode_ends_exactly_once_at_target() {
    // every roll scores 400 with two dice left
    let scores = |_: &[u8]| Scored::new(400, vec![2, 3]);
    let mut env = GameEnvironment::new(scores, EnvironmentConfig::default(), Some(4));
    let mut banked = 0;

    loop {
        assert_eq!(env.step(Action::Roll).reward, 0.0);
        let before = *env.state();
        let outcome = env.step(Action::Stand);
        banked += before.turn.turn_score;

        if banked >= 10_000 {
            assert!(outcome.episode_done);
            assert_eq!(*env.state(), EpisodeState::initial());
            break;
        }
        assert!(!outcome.episode_done);
        assert_eq!(outcome.reward, 0.0);
        assert_eq!(env.state().total_score, banked);
    }
}

#[test]
fn total_score_never_decreases_under_random_play() {
    let mut env = GameEnvironment::standard(Some(5));
    let mut rng = StdRng::seed_from_u64(5);
    let mut last_total = 0;

    for _ in 0..5_000 {
        let action = if rng.random_bool(0.5) {
            Action::Stand
        } else {
            Action::Roll
        };
        let outcome = env.step(action);
        if outcome.episode_done {
            last_total = 0;
            continue;
        }
        assert!(env.state().total_score >= last_total);
        assert!(env.state().turn.dice_remaining <= 6);
        last_total = env.state().total_score;
    }
}
