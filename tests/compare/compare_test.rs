#[cfg(test)]
mod tests {
    use serptrends::compare::{
        compare, declining_with_rising_reach, top_n_by, DeltaField, SortDirection,
        DECLINING_REACH_CAP, NEW_ENTITY_PCT_CHANGE,
    };
    use serptrends::model::{AggregatedRow, DimensionKey};

    fn agg(key: &str, clicks: u64, impressions: u64, ctr: f64, position: f64) -> AggregatedRow {
        AggregatedRow {
            key: DimensionKey::query(key),
            clicks,
            impressions,
            ctr,
            position,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_diffs_are_exact_for_keys_in_both_periods() {
        let current = vec![agg("shoes", 10, 100, 0.10, 5.0)];
        let previous = vec![agg("shoes", 20, 80, 0.25, 3.0)];
        let out = compare(&current, &previous).unwrap();

        assert_eq!(out.len(), 1);
        let row = &out[0];
        assert_eq!(row.clicks_diff, -10);
        assert_eq!(row.impressions_diff, 20);
        assert!(approx(row.ctr_diff, -0.15));
        assert!(approx(row.position_diff, -2.0));
        assert_eq!(
            row.clicks_diff,
            row.clicks_current as i64 - row.clicks_previous as i64
        );
    }

    #[test]
    fn test_position_diff_sign_convention() {
        // Moved from position 10 to position 5: an improvement, so the
        // diff must be positive.
        let current = vec![agg("shoes", 10, 100, 0.1, 5.0)];
        let previous = vec![agg("shoes", 10, 100, 0.1, 10.0)];
        let out = compare(&current, &previous).unwrap();
        assert!(approx(out[0].position_diff, 5.0));
    }

    #[test]
    fn test_new_key_is_zero_filled_with_sentinel_pct() {
        let current = vec![agg("new-term", 15, 200, 0.075, 9.0)];
        let out = compare(&current, &[]).unwrap();

        let row = &out[0];
        assert_eq!(row.clicks_previous, 0);
        assert_eq!(row.impressions_previous, 0);
        assert_eq!(row.ctr_previous, 0.0);
        assert_eq!(row.position_previous, 0.0);
        assert_eq!(row.clicks_diff, 15);
        assert_eq!(row.clicks_pct_change, NEW_ENTITY_PCT_CHANGE);
    }

    #[test]
    fn test_dropped_key_is_zero_filled_on_current_side() {
        let previous = vec![agg("gone", 30, 300, 0.1, 4.0)];
        let out = compare(&[], &previous).unwrap();

        let row = &out[0];
        assert_eq!(row.clicks_current, 0);
        assert_eq!(row.clicks_diff, -30);
        assert!(approx(row.clicks_pct_change, -100.0));
    }

    #[test]
    fn test_empty_both_sides_is_empty_not_error() {
        let out = compare(&[], &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_pct_change_against_nonzero_previous() {
        let current = vec![agg("shoes", 30, 100, 0.3, 1.0)];
        let previous = vec![agg("shoes", 20, 100, 0.2, 1.0)];
        let out = compare(&current, &previous).unwrap();
        assert!(approx(out[0].clicks_pct_change, 50.0));
    }

    #[test]
    fn test_non_finite_rate_fails_with_named_field() {
        let current = vec![agg("bad", 1, 10, f64::NAN, 1.0)];
        let err = compare(&current, &[]).unwrap_err();
        assert_eq!(err.key, "bad");
        assert_eq!(err.field, "ctr");
    }

    #[test]
    fn test_top_n_by_descending_with_stable_ties() {
        let current = vec![
            agg("a", 10, 100, 0.1, 1.0),
            agg("b", 30, 100, 0.1, 1.0),
            agg("c", 30, 100, 0.1, 1.0),
            agg("d", 5, 100, 0.1, 1.0),
        ];
        let out = compare(&current, &[]).unwrap();
        let top = top_n_by(&out, DeltaField::ClicksDiff, 3, SortDirection::Descending);

        let keys: Vec<String> = top.iter().map(|r| r.key.label()).collect();
        // b and c tie on clicks_diff = 30; input order breaks the tie.
        assert_eq!(keys, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_top_n_by_ascending_surfaces_losers() {
        let current = vec![agg("a", 10, 100, 0.1, 1.0), agg("b", 0, 100, 0.1, 1.0)];
        let previous = vec![agg("a", 5, 100, 0.1, 1.0), agg("b", 40, 100, 0.1, 1.0)];
        let out = compare(&current, &previous).unwrap();
        let worst = top_n_by(&out, DeltaField::ClicksDiff, 1, SortDirection::Ascending);
        assert_eq!(worst[0].key, DimensionKey::query("b"));
        assert_eq!(worst[0].clicks_diff, -40);
    }

    #[test]
    fn test_declining_with_rising_reach_flags_the_losing_row() {
        let current = vec![agg("shoes", 10, 100, 0.10, 5.0)];
        let previous = vec![agg("shoes", 20, 80, 0.25, 3.0)];
        let out = compare(&current, &previous).unwrap();

        let flagged = declining_with_rising_reach(&out);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].key, DimensionKey::query("shoes"));
    }

    #[test]
    fn test_declining_with_rising_reach_never_passes_gainers() {
        let current = vec![
            agg("gainer", 50, 500, 0.10, 2.0),
            agg("flat", 10, 100, 0.10, 5.0),
            agg("loser", 5, 300, 0.016, 7.0),
        ];
        let previous = vec![
            agg("gainer", 10, 100, 0.10, 5.0),
            agg("flat", 10, 100, 0.10, 5.0),
            agg("loser", 20, 100, 0.20, 6.0),
        ];
        let out = compare(&current, &previous).unwrap();
        let flagged = declining_with_rising_reach(&out);

        assert!(flagged.iter().all(|r| r.clicks_diff < 0));
        assert!(flagged.iter().all(|r| r.ctr_diff < 0.0));
        assert!(flagged.iter().all(|r| r.impressions_diff > 0));
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].key, DimensionKey::query("loser"));
    }

    #[test]
    fn test_declining_with_rising_reach_caps_at_twenty() {
        let mut current = Vec::new();
        let mut previous = Vec::new();
        for i in 0..30 {
            let name = format!("q{i}");
            // All declining with rising reach; impressions_diff = i + 1.
            current.push(agg(&name, 1, 100 + i + 1, 0.01, 5.0));
            previous.push(agg(&name, 10, 100, 0.10, 5.0));
        }
        let out = compare(&current, &previous).unwrap();
        let flagged = declining_with_rising_reach(&out);

        assert_eq!(flagged.len(), DECLINING_REACH_CAP);
        // Ordered by impressions_diff descending.
        assert_eq!(flagged[0].key, DimensionKey::query("q29"));
        assert_eq!(flagged[19].key, DimensionKey::query("q10"));
    }

    #[test]
    fn test_outer_join_emits_every_key_once() {
        let current = vec![agg("both", 10, 100, 0.1, 5.0), agg("only-cur", 1, 10, 0.1, 9.0)];
        let previous = vec![agg("both", 5, 50, 0.1, 6.0), agg("only-prev", 2, 20, 0.1, 8.0)];
        let out = compare(&current, &previous).unwrap();

        let keys: Vec<String> = out.iter().map(|r| r.key.label()).collect();
        assert_eq!(keys, vec!["both", "only-cur", "only-prev"]);
    }
}
