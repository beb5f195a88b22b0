#![cfg(not(target_arch = "wasm32"))]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use elemental_wasm::state::{sync_palette, ThemeEvent, ThemeState};
use elemental_wasm::ThemeId;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const D: Duration = Duration::from_millis(600);

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn change_to_current_theme_is_noop() {
    for id in ThemeId::ALL {
        let mut state = ThemeState::new(id, D);
        assert_eq!(state.change_theme(id, ms(0)), None);
        assert!(!state.is_transitioning());
        assert!(state.advance(ms(10_000)).is_empty());
        assert_eq!(state.current(), id);
    }
}

#[test]
fn change_while_transitioning_is_noop() {
    let mut state = ThemeState::new(ThemeId::Electricity, D);
    assert!(state.change_theme(ThemeId::Fire, ms(0)).is_some());
    for id in ThemeId::ALL {
        assert_eq!(state.change_theme(id, ms(10)), None);
    }
    state.advance(ms(600));
    assert_eq!(state.current(), ThemeId::Fire);
    assert!(!state.is_transitioning());
}

#[test]
fn unknown_name_never_mutates() {
    let mut state = ThemeState::new(ThemeId::Electricity, D);
    assert_eq!(state.change_theme_named("plasma", ms(0)), None);
    assert_eq!(state.change_theme_named("", ms(0)), None);
    assert_eq!(state.current(), ThemeId::Electricity);
    assert!(!state.is_transitioning());
    assert!(state.advance(ms(10_000)).is_empty());

    assert!(state.change_theme_named("shadow", ms(0)).is_some());
}

#[test]
fn swap_at_midpoint_and_settle_after_full_duration() {
    let mut state = ThemeState::new(ThemeId::Electricity, D);
    assert_eq!(
        state.change_theme(ThemeId::Water, ms(1000)),
        Some(ThemeEvent::TransitionStarted {
            from: ThemeId::Electricity,
            to: ThemeId::Water,
        })
    );
    assert!(state.is_transitioning());

    assert!(state.advance(ms(1299)).is_empty());
    assert_eq!(state.current(), ThemeId::Electricity);

    assert_eq!(
        state.advance(ms(1300)),
        vec![ThemeEvent::Swapped {
            from: ThemeId::Electricity,
            to: ThemeId::Water,
        }]
    );
    assert_eq!(state.current(), ThemeId::Water);
    assert!(state.is_transitioning());

    assert!(state.advance(ms(1599)).is_empty());
    assert!(state.is_transitioning());

    assert_eq!(
        state.advance(ms(1600)),
        vec![ThemeEvent::Settled {
            theme: ThemeId::Water,
        }]
    );
    assert!(!state.is_transitioning());
}

#[test]
fn late_tick_runs_both_phases_in_order() {
    let mut state = ThemeState::new(ThemeId::Electricity, D);
    state.change_theme(ThemeId::Ice, ms(0));
    assert_eq!(
        state.advance(ms(5000)),
        vec![
            ThemeEvent::Swapped {
                from: ThemeId::Electricity,
                to: ThemeId::Ice,
            },
            ThemeEvent::Settled { theme: ThemeId::Ice },
        ]
    );
}

#[test]
fn rapid_repeat_request_completes_once() {
    let mut state = ThemeState::new(ThemeId::Electricity, D);
    assert!(state.change_theme(ThemeId::Fire, ms(0)).is_some());
    assert_eq!(state.change_theme(ThemeId::Fire, ms(20)), None);

    let mut events = state.advance(ms(300));
    events.extend(state.advance(ms(600)));
    let swaps = events
        .iter()
        .filter(|e| matches!(e, ThemeEvent::Swapped { .. }))
        .count();
    assert_eq!(swaps, 1);
    assert_eq!(state.current(), ThemeId::Fire);
    assert!(!state.is_transitioning());
}

#[test]
fn subscribers_see_every_event_until_unsubscribed() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut state = ThemeState::new(ThemeId::Electricity, D);
    let sub = {
        let seen = Rc::clone(&seen);
        state.subscribe(move |e| seen.borrow_mut().push(*e))
    };

    state.change_theme(ThemeId::Nature, ms(0));
    state.advance(ms(600));
    assert_eq!(seen.borrow().len(), 3);

    assert!(state.unsubscribe(sub));
    assert!(!state.unsubscribe(sub));
    state.change_theme(ThemeId::Wind, ms(1000));
    state.advance(ms(2000));
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn palette_sync_writes_three_variables() {
    let mut vars = BTreeMap::new();
    sync_palette(&mut vars, &ThemeId::Fire.theme().colors);
    assert_eq!(vars.len(), 3);
    assert_eq!(vars["--color-primary"], "#E53935");
    assert_eq!(vars["--color-secondary"], "#F28B82");
    assert_eq!(vars["--color-tertiary"], "#6A1B1A");

    sync_palette(&mut vars, &ThemeId::Ice.theme().colors);
    assert_eq!(vars["--color-primary"], "#9ADCF7");
}

#[test]
fn keyboard_order_wraps_both_ways() {
    let mut id = ThemeId::Electricity;
    for _ in 0..7 {
        id = id.next();
    }
    assert_eq!(id, ThemeId::Electricity);
    assert_eq!(ThemeId::Electricity.prev(), ThemeId::Shadow);
    assert_eq!(ThemeId::Shadow.next(), ThemeId::Electricity);
}

proptest! {
    #[test]
    fn every_accepted_request_swaps_exactly_once(
        requests in proptest::collection::vec((0usize..7, 0u64..900), 1..40),
    ) {
        let mut state = ThemeState::new(ThemeId::Electricity, D);
        let mut now = ms(0);
        let mut accepted = 0;
        let mut swaps = 0;
        for (idx, gap) in requests {
            now += ms(gap);
            for e in state.advance(now) {
                if matches!(e, ThemeEvent::Swapped { .. }) {
                    swaps += 1;
                }
            }
            if state.change_theme(ThemeId::ALL[idx], now).is_some() {
                accepted += 1;
            }
        }
        for e in state.advance(now + ms(10_000)) {
            if matches!(e, ThemeEvent::Swapped { .. }) {
                swaps += 1;
            }
        }
        prop_assert_eq!(accepted, swaps);
        prop_assert!(!state.is_transitioning());
    }
}
