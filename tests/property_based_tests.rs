//! Property-based tests for checkpoint parsing and speed evaluation

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use quickcheck::QuickCheck;
use speedtrap::checkpoint::{parse_checkpoints, parse_line, Checkpoint, CheckpointTable};
use speedtrap::speed::{round3, SpeedEvaluator, GRACE_FACTOR};

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn checkpoint(registration: &str, timestamp: NaiveDateTime) -> Checkpoint {
    Checkpoint {
        registration: registration.to_string(),
        timestamp,
        raw_timestamp: timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

/// Property: parsing arbitrary text never panics and never yields empty registrations
#[test]
fn prop_parse_checkpoints_total() {
    fn check(contents: String) -> bool {
        let (table, skipped) = parse_checkpoints(&contents);
        table.registrations().all(|r| !r.is_empty() && r == r.trim())
            && skipped.iter().all(|s| s.line_number >= 1)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(check as fn(String) -> bool);
}

proptest! {
    #[test]
    fn prop_parse_line_no_panic(line in ".*") {
        let _ = parse_line(&line);
    }

    #[test]
    fn prop_average_speed_matches_formula(
        elapsed in 1i64..86_400,
        distance in 0.1f64..100.0,
        limit in 1.0f64..200.0,
    ) {
        let entry: CheckpointTable = std::iter::once(checkpoint("P1", base_time())).collect();
        let exit: CheckpointTable =
            std::iter::once(checkpoint("P1", base_time() + Duration::seconds(elapsed))).collect();

        let evaluator = SpeedEvaluator::new(limit, distance);
        let expected = round3(distance / (elapsed as f64 / 3600.0));
        let report = evaluator.evaluate(&entry, &exit);

        match report.violations.get("P1") {
            Some(violation) => {
                prop_assert_eq!(violation.average_speed, expected);
                prop_assert!(expected > limit * GRACE_FACTOR);
            }
            None => prop_assert!(expected <= limit * GRACE_FACTOR),
        }
    }

    #[test]
    fn prop_violations_only_for_registrations_in_both_tables(
        entry_only in prop::collection::hash_set("[A-M]{2}[0-9]{3}", 0..8),
        exit_only in prop::collection::hash_set("[N-Z]{2}[0-9]{3}", 0..8),
        offsets in prop::collection::vec(1i64..30, 16),
        shared_offset in 1i64..30,
    ) {
        let shared = "SHARED1";
        let entry: CheckpointTable = entry_only
            .iter()
            .map(|r| checkpoint(r, base_time()))
            .chain(std::iter::once(checkpoint(shared, base_time())))
            .collect();
        let exit: CheckpointTable = exit_only
            .iter()
            .zip(offsets.iter())
            .map(|(r, s)| checkpoint(r, base_time() + Duration::seconds(*s)))
            .chain(std::iter::once(checkpoint(
                shared,
                base_time() + Duration::seconds(shared_offset),
            )))
            .collect();

        let report = SpeedEvaluator::default().evaluate(&entry, &exit);
        prop_assert_eq!(report.evaluated, 1);
        // under 30 s for 5 units is always far above the threshold
        prop_assert_eq!(
            report.violations.keys().map(String::as_str).collect::<Vec<_>>(),
            vec![shared]
        );
    }

    #[test]
    fn prop_direction_does_not_matter(elapsed in 1i64..3_600) {
        let early: CheckpointTable = std::iter::once(checkpoint("P1", base_time())).collect();
        let late: CheckpointTable =
            std::iter::once(checkpoint("P1", base_time() + Duration::seconds(elapsed))).collect();

        let evaluator = SpeedEvaluator::default();
        let forward = evaluator.evaluate(&early, &late);
        let backward = evaluator.evaluate(&late, &early);
        prop_assert_eq!(
            forward.violations.get("P1").map(|v| v.average_speed),
            backward.violations.get("P1").map(|v| v.average_speed)
        );
    }
}
