#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serptrends::model::{DimensionKey, MetricRow};
    use serptrends::trend::{daily_totals, pivot_for_chart, select_trend};
    use std::collections::HashSet;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn row(key: DimensionKey, day: u32, clicks: u64) -> MetricRow {
        MetricRow {
            key,
            date: Some(date(day)),
            clicks,
            impressions: clicks * 10,
            ctr: 0.1,
            position: 5.0,
        }
    }

    #[test]
    fn test_select_trend_keeps_only_top_keys() {
        let rows = vec![
            row(DimensionKey::query("shoes"), 1, 5),
            row(DimensionKey::query("boots"), 1, 3),
            row(DimensionKey::query("shoes"), 2, 7),
            row(DimensionKey::query("socks"), 2, 1),
        ];
        let top: HashSet<DimensionKey> =
            [DimensionKey::query("shoes"), DimensionKey::query("boots")]
                .into_iter()
                .collect();

        let selected = select_trend(&rows, &top);
        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|r| top.contains(&r.key)));
        // Date and key survive for charting.
        assert_eq!(selected[0].date, Some(date(1)));
    }

    #[test]
    fn test_pivot_fills_missing_cells_with_zero() {
        // "shoes" appears on day 1 only, "boots" on day 2 only.
        let rows = vec![
            row(DimensionKey::query("shoes"), 1, 5),
            row(DimensionKey::query("boots"), 2, 3),
        ];
        let table = pivot_for_chart(&rows).unwrap();

        // Date axis is the union of dates across both keys.
        assert_eq!(table.dates, vec![date(1), date(2)]);
        assert_eq!(table.columns.len(), 2);

        // A key with no traffic on a day is zero, not absent.
        assert_eq!(table.value(date(1), &DimensionKey::query("shoes")), Some(5));
        assert_eq!(table.value(date(1), &DimensionKey::query("boots")), Some(0));
        assert_eq!(table.value(date(2), &DimensionKey::query("shoes")), Some(0));
        assert_eq!(table.value(date(2), &DimensionKey::query("boots")), Some(3));
    }

    #[test]
    fn test_pivot_dates_are_sorted() {
        let rows = vec![
            row(DimensionKey::query("a"), 20, 1),
            row(DimensionKey::query("a"), 3, 2),
            row(DimensionKey::query("a"), 11, 3),
        ];
        let table = pivot_for_chart(&rows).unwrap();
        assert_eq!(table.dates, vec![date(3), date(11), date(20)]);
        assert_eq!(table.values, vec![vec![2], vec![3], vec![1]]);
    }

    #[test]
    fn test_pivot_empty_input_is_empty_table() {
        let table = pivot_for_chart(&[]).unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_pivot_requires_dates() {
        let rows = vec![MetricRow {
            key: DimensionKey::query("shoes"),
            date: None,
            clicks: 1,
            impressions: 10,
            ctr: 0.1,
            position: 5.0,
        }];
        let err = pivot_for_chart(&rows).unwrap_err();
        assert_eq!(err.field, "date");
        assert_eq!(err.key, "shoes");
    }

    #[test]
    fn test_daily_totals_counts_clicks_and_unique_pages() {
        let rows = vec![
            row(DimensionKey::page("/a"), 1, 5),
            row(DimensionKey::page("/b"), 1, 3),
            row(DimensionKey::page("/a"), 2, 2),
            // Same page twice on day 2: still one unique URL.
            row(DimensionKey::page("/a"), 2, 1),
        ];
        let totals = daily_totals(&rows);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, date(1));
        assert_eq!(totals[0].clicks, 8);
        assert_eq!(totals[0].unique_pages, 2);
        assert_eq!(totals[1].clicks, 3);
        assert_eq!(totals[1].unique_pages, 1);
    }
}
