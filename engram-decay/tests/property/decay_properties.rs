use chrono::{Duration, Utc};
use engram_decay::effective_score;
use proptest::prelude::*;

proptest! {
    /// effective(m) ∈ [0, 1] for any valid importance and any age.
    #[test]
    fn score_is_bounded(importance in 0.0f64..=1.0, age_days in 0i64..20_000) {
        let now = Utc::now();
        let created = now - Duration::days(age_days);
        let score = effective_score(importance, false, created, now);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// Pinned forces the maximum score regardless of everything else.
    #[test]
    fn pinned_is_always_one(importance in 0.0f64..=1.0, age_days in 0i64..20_000) {
        let now = Utc::now();
        let created = now - Duration::days(age_days);
        prop_assert_eq!(effective_score(importance, true, created, now), 1.0);
    }

    /// Older memories never outscore younger ones at equal importance.
    #[test]
    fn monotonically_non_increasing_with_age(
        importance in 0.0f64..=1.0,
        younger in 0i64..5_000,
        extra in 0i64..5_000,
    ) {
        let now = Utc::now();
        let young = effective_score(importance, false, now - Duration::days(younger), now);
        let old = effective_score(importance, false, now - Duration::days(younger + extra), now);
        prop_assert!(old <= young + f64::EPSILON);
    }

    /// The decay factor never drops below the floor: at any age, score is
    /// at least importance × 0.1.
    #[test]
    fn floor_holds(importance in 0.0f64..=1.0, age_days in 0i64..20_000) {
        let now = Utc::now();
        let created = now - Duration::days(age_days);
        let score = effective_score(importance, false, created, now);
        prop_assert!(score >= importance * 0.1 - f64::EPSILON);
    }
}
