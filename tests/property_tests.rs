//! Property tests for the growth models and region aggregation.
//!
//! Uses proptest to verify:
//! 1. Exponential recovery: a noiseless exponential yields its own rate and R² = 1
//! 2. Partition: a country plus the rest of the world adds up to the world
//! 3. Linear evolution: a linear series has a constant daily increase
//! 4. Logistic bounds: the curve stays within [0, ceiling] for -1 < alpha <= 1
//! 5. Death-rate ordering: the lower bound never exceeds the upper one
//! 6. Reader robustness: arbitrary input is rejected, never a panic

use case_curve_analyzer::analysis::{
    death_rate_bounds, evolution, fit_exponential, fit_logistic, select,
};
use case_curve_analyzer::io::read_time_series_from_bytes;
use case_curve_analyzer::models::{RegionRecord, Totals};
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_days(range: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    range.prop_map(|n| (0..n).map(|d| d as f64).collect())
}

fn arb_records(ndays: usize) -> impl Strategy<Value = Vec<RegionRecord>> {
    let record = (
        prop::sample::select(vec!["China", "Italy", "US", "France"]),
        prop::collection::vec(0u32..5000, ndays),
    )
        .prop_map(|(country, counts)| {
            RegionRecord::new(country, counts.into_iter().map(f64::from).collect())
        });
    prop::collection::vec(record, 0..12)
}

// ── 1. Exponential recovery ──────────────────────────────────────────

proptest! {
    #[test]
    fn exponential_recovers_rate(
        days in arb_days(3..60),
        seed in 30.0..1000.0_f64,
        rate in 0.01..0.5_f64,
    ) {
        let cases: Vec<f64> = days.iter().map(|d| seed * (rate * d).exp()).collect();
        let fit = fit_exponential(&days, &cases).unwrap();

        prop_assert_eq!(fit.start_index, 0);
        prop_assert!((fit.a - rate).abs() < 1e-9, "a = {}, rate = {}", fit.a, rate);
        prop_assert!((fit.b - seed.ln()).abs() < 1e-6);
        prop_assert!((fit.r_squared - 1.0).abs() < 1e-9);
        prop_assert!((fit.alpha - (rate.exp() - 1.0)).abs() < 1e-9);
    }

    /// Days below the threshold are skipped, whatever their count.
    #[test]
    fn exponential_skips_leading_small_counts(
        lead in prop::collection::vec(0.0..29.9_f64, 1..10),
        rate in 0.05..0.4_f64,
    ) {
        let mut cases = lead.clone();
        cases.extend((0..8).map(|i| 30.0 * (rate * i as f64).exp()));
        let days: Vec<f64> = (0..cases.len()).map(|d| d as f64).collect();

        let fit = fit_exponential(&days, &cases).unwrap();
        prop_assert_eq!(fit.start_index, lead.len());
        prop_assert_eq!(fit.num_points(), 8);
        prop_assert!((fit.a - rate).abs() < 1e-9);
    }
}

// ── 2. Partition ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn include_plus_exclude_is_world(
        records in arb_records(6),
        country in prop::sample::select(vec!["China", "Italy", "Atlantis"]),
    ) {
        let inside = select(&records, country, 6, false).unwrap();
        let outside = select(&records, country, 6, true).unwrap();
        let totals = Totals::compute(&records, 6);

        for day in 0..6 {
            prop_assert_eq!(inside.values[day] + outside.values[day], totals.world.values[day]);
        }
    }

    #[test]
    fn focus_totals_match_selection(records in arb_records(4)) {
        let totals = Totals::compute(&records, 4);
        let china = select(&records, "China", 4, false).unwrap();
        let rest = select(&records, "China", 4, true).unwrap();
        prop_assert_eq!(totals.focus.values, china.values);
        prop_assert_eq!(totals.rest_of_world.values, rest.values);
    }
}

// ── 3. Linear evolution ──────────────────────────────────────────────

proptest! {
    #[test]
    fn linear_series_has_constant_increase(
        days in arb_days(3..50),
        slope in 1.0..500.0_f64,
        offset in 0.0..1000.0_f64,
    ) {
        let cases: Vec<f64> = days.iter().map(|d| offset + slope * d).collect();
        let evo = evolution(&days, &cases).unwrap();

        for inc in &evo.increase {
            prop_assert!((inc - slope).abs() < 1e-6 * slope.max(1.0), "{} vs {}", inc, slope);
        }
        prop_assert_eq!(evo.growth_factor[0], 0.0);
        prop_assert_eq!(evo.growth_factor[1], 0.0);
        for g in &evo.growth_factor[2..] {
            prop_assert!((g - 1.0).abs() < 1e-6);
        }
    }
}

// ── 4. Logistic bounds ───────────────────────────────────────────────

proptest! {
    #[test]
    fn logistic_stays_within_ceiling(
        days in arb_days(2..80),
        alpha in -0.99..=1.0_f64,
        ceiling in 100.0..1e6_f64,
        fraction in 0.0..0.999_f64,
    ) {
        let seed = 30.0 + fraction * (ceiling - 30.0);
        let cases = vec![seed; days.len()];
        let fit = fit_logistic(&days, alpha, ceiling, &cases).unwrap();

        prop_assert_eq!(fit.curve.len(), days.len());
        prop_assert_eq!(fit.curve[0], seed);
        for v in &fit.curve {
            prop_assert!(*v >= 0.0 && *v <= ceiling * (1.0 + 1e-12), "{} outside [0, {}]", v, ceiling);
        }
    }

    /// With a positive rate the projection never decreases.
    #[test]
    fn logistic_monotone_for_positive_alpha(
        days in arb_days(2..80),
        alpha in 0.01..=1.0_f64,
        ceiling in 100.0..1e6_f64,
    ) {
        let cases = vec![30.0; days.len()];
        let fit = fit_logistic(&days, alpha, ceiling, &cases).unwrap();
        prop_assert!(fit.curve.windows(2).all(|w| w[1] >= w[0] - 1e-9 * ceiling));
    }
}

// ── 5. Death-rate ordering ───────────────────────────────────────────

proptest! {
    #[test]
    fn death_rate_lower_below_upper(
        rows in prop::collection::vec((1u32..10_000, 0.0..1.0_f64, 0.01..1.0_f64), 1..30),
    ) {
        // deaths <= recovered <= confirmed, all positive denominators
        let confirmed: Vec<f64> = rows.iter().map(|(c, _, _)| f64::from(*c)).collect();
        let recovered: Vec<f64> = rows.iter().map(|(c, _, r)| f64::from(*c) * r).collect();
        let deaths: Vec<f64> = recovered.iter().zip(&rows).map(|(r, (_, d, _))| r * d).collect();

        let bounds = death_rate_bounds(&confirmed, &deaths, &recovered).unwrap();
        for (lower, upper) in bounds.lower.iter().zip(&bounds.upper) {
            prop_assert!(lower <= &(upper + 1e-9));
            prop_assert!(*upper <= 100.0 + 1e-9);
        }
    }
}

// ── 6. Reader robustness ─────────────────────────────────────────────

proptest! {
    #[test]
    fn reader_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = read_time_series_from_bytes(&data, "fuzz");
    }

    #[test]
    fn reader_accepts_well_formed_rows(
        rows in prop::collection::vec(
            ("[A-Z][a-z]{2,8}", prop::collection::vec(0u32..100_000, 3)),
            1..8,
        ),
    ) {
        let mut csv = String::from("Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20\n");
        for (country, counts) in &rows {
            let counts: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
            csv.push_str(&format!(",{country},0,0,{}\n", counts.join(",")));
        }

        let table = read_time_series_from_bytes(csv.as_bytes(), "Confirmed").unwrap();
        prop_assert_eq!(table.num_regions(), rows.len());
        prop_assert_eq!(table.num_days(), 3);
        for (record, (country, counts)) in table.records.iter().zip(&rows) {
            prop_assert_eq!(&record.country, country);
            prop_assert_eq!(record.province.as_deref(), None);
            let expected: Vec<f64> = counts.iter().map(|c| f64::from(*c)).collect();
            prop_assert_eq!(&record.counts, &expected);
        }
    }
}
