//! Property-based tests for the staircase and the interpolator
//!
//! Uses proptest to check the procedure invariants over arbitrary response
//! sequences and measurement sets.

use hearing_core::{interpolate, AdaptiveStaircase, MeasuredPoint, StaircaseConfig, StepDirection};
use proptest::prelude::*;

// ===== Helpers =====

fn arbitrary_config() -> impl Strategy<Value = StaircaseConfig> {
    (
        -100.0f64..10.0, // start_db
        0.5f64..12.0,    // step_db
        1u32..4,         // down
        1u32..3,         // up
        -120.0f64..-30.0, // min_db
        -20.0f64..6.0,   // max_db
        1usize..10,      // stop_reversals
    )
        .prop_map(
            |(start_db, step_db, down, up, min_db, max_db, stop_reversals)| StaircaseConfig {
                start_db,
                step_db,
                down,
                up,
                min_db,
                max_db,
                stop_reversals,
            },
        )
}

fn arbitrary_measurements() -> impl Strategy<Value = Vec<MeasuredPoint>> {
    prop::collection::vec((20u32..20_000, -20.0f64..80.0), 1..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(f, db)| MeasuredPoint::new(f, db))
            .collect()
    })
}

// ===== Staircase =====

proptest! {
    /// Property: level never leaves [min_db, max_db]
    #[test]
    fn level_stays_within_bounds(
        config in arbitrary_config(),
        responses in prop::collection::vec(any::<bool>(), 0..200)
    ) {
        let mut staircase = AdaptiveStaircase::new(config.clone()).unwrap();
        prop_assert!(staircase.current_level_db() >= config.min_db);
        prop_assert!(staircase.current_level_db() <= config.max_db);

        for heard in responses {
            let step = staircase.record_response(heard);
            let db = staircase.current_level_db();
            prop_assert!(db >= config.min_db && db <= config.max_db, "{} outside bounds", db);
            prop_assert!((0.0..=1.0).contains(&step.level));
        }
    }

    /// Property: hit counter stays in [0, down) and reversal count never decreases
    #[test]
    fn counters_are_well_behaved(
        config in arbitrary_config(),
        responses in prop::collection::vec(any::<bool>(), 0..200)
    ) {
        let mut staircase = AdaptiveStaircase::new(config.clone()).unwrap();
        let mut reversals = 0;

        for heard in responses {
            let before = staircase.last_direction();
            staircase.record_response(heard);
            let after = staircase.last_direction();

            prop_assert!(staircase.consecutive_hits() < config.down);
            prop_assert!(staircase.reversal_count() >= reversals);

            // a new reversal implies a direction change from a known direction
            if staircase.reversal_count() > reversals {
                prop_assert_eq!(staircase.reversal_count(), reversals + 1);
                prop_assert!(before.is_some());
                prop_assert_ne!(before, after);
            }
            reversals = staircase.reversal_count();
        }
    }

    /// Property: `down` hits in a row from a fresh staircase step down exactly once
    #[test]
    fn down_hits_make_one_step(config in arbitrary_config()) {
        let mut staircase = AdaptiveStaircase::new(config.clone()).unwrap();
        let start = staircase.current_level_db();

        for _ in 0..config.down {
            staircase.record_response(true);
        }

        prop_assert_eq!(staircase.consecutive_hits(), 0);
        prop_assert_eq!(staircase.last_direction(), Some(StepDirection::Down));
        let expected = (start - config.step_db).max(config.min_db);
        prop_assert_eq!(staircase.current_level_db(), expected);
        prop_assert_eq!(staircase.reversal_count(), 0);
    }

    /// Property: with a 1-down/1-up rule, alternating responses reverse on
    /// every step after the first
    #[test]
    fn alternating_responses_always_reverse(
        first_heard in any::<bool>(),
        length in 2usize..40
    ) {
        let config = StaircaseConfig {
            down: 1,
            stop_reversals: 1000,
            ..Default::default()
        };
        let mut staircase = AdaptiveStaircase::new(config).unwrap();

        for i in 0..length {
            staircase.record_response(first_heard ^ (i % 2 == 1));
            prop_assert_eq!(staircase.reversal_count(), i);
        }
    }

    /// Property: estimate is the mean of the last (up to) four reversals
    #[test]
    fn estimate_uses_recent_reversals(
        config in arbitrary_config(),
        responses in prop::collection::vec(any::<bool>(), 0..200)
    ) {
        let mut staircase = AdaptiveStaircase::new(config).unwrap();
        for heard in responses {
            staircase.record_response(heard);
        }

        let reversals = staircase.reversals();
        let expected = if reversals.is_empty() {
            staircase.current_level_db()
        } else {
            let recent = &reversals[reversals.len().saturating_sub(4)..];
            recent.iter().sum::<f64>() / recent.len() as f64
        };
        prop_assert!((staircase.estimate_db() - expected).abs() < 1e-9);
    }
}

// ===== Interpolation =====

proptest! {
    /// Property: measured frequencies come back with their first stored level
    #[test]
    fn exact_hits_are_preserved(measured in arbitrary_measurements()) {
        let targets: Vec<u32> = measured.iter().map(|p| p.frequency_hz).collect();
        let out = interpolate(&measured, &targets);

        prop_assert_eq!(out.len(), targets.len());
        for point in out {
            let first = measured
                .iter()
                .find(|m| m.frequency_hz == point.frequency_hz)
                .unwrap();
            prop_assert_eq!(point.level_db, first.level_db);
        }
    }

    /// Property: results stay within the measured level range (no extrapolation)
    #[test]
    fn results_are_bounded_by_measurements(
        measured in arbitrary_measurements(),
        targets in prop::collection::vec(1u32..40_000, 0..30)
    ) {
        let out = interpolate(&measured, &targets);
        let lo = measured.iter().map(|p| p.level_db).fold(f64::INFINITY, f64::min);
        let hi = measured.iter().map(|p| p.level_db).fold(f64::NEG_INFINITY, f64::max);

        prop_assert_eq!(out.len(), targets.len());
        for (point, target) in out.iter().zip(&targets) {
            prop_assert_eq!(point.frequency_hz, *target);
            prop_assert!(point.level_db >= lo - 1e-9 && point.level_db <= hi + 1e-9);
        }
    }

    /// Property: targets outside the measured range plateau at the endpoints
    #[test]
    fn edges_plateau(measured in arbitrary_measurements()) {
        let min_f = measured.iter().map(|p| p.frequency_hz).min().unwrap();
        let max_f = measured.iter().map(|p| p.frequency_hz).max().unwrap();
        let low = measured.iter().find(|p| p.frequency_hz == min_f).unwrap().level_db;
        let high = measured.iter().find(|p| p.frequency_hz == max_f).unwrap().level_db;

        let out = interpolate(&measured, &[min_f / 2 + 1, max_f * 2]);
        if min_f / 2 + 1 < min_f {
            prop_assert_eq!(out[0].level_db, low);
        }
        prop_assert_eq!(out[1].level_db, high);
    }
}

#[test]
fn empty_measurements_interpolate_to_nothing() {
    assert!(interpolate(&[], &[125, 250, 500]).is_empty());
    assert!(interpolate(&[], &[]).is_empty());
}
