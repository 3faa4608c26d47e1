#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serptrends::export::{
        write_aggregated_csv, write_chart_csv, write_comparison_csv, write_daily_csv,
        write_raw_csv,
    };
    use serptrends::model::{AggregatedRow, ComparisonRow, DimensionKey, MetricRow};
    use serptrends::trend::{pivot_for_chart, DailyTotal};

    fn csv<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_aggregated_csv() {
        let rows = vec![AggregatedRow {
            key: DimensionKey::query("shoes"),
            clicks: 40,
            impressions: 400,
            ctr: 0.2,
            position: 4.0,
        }];
        let out = csv(|w| write_aggregated_csv(w, &rows));
        insta::assert_snapshot!(out.trim_end(), @r"
        key,clicks,impressions,ctr,position
        shoes,40,400,0.2,4.0
        ");
    }

    #[test]
    fn test_comparison_csv_header_matches_field_names() {
        let out = csv(|w| write_comparison_csv(w, &[]));
        assert_eq!(
            out.lines().next().unwrap(),
            "key,clicks_current,clicks_previous,impressions_current,impressions_previous,\
             ctr_current,ctr_previous,position_current,position_previous,clicks_diff,\
             ctr_diff,impressions_diff,position_diff,clicks_pct_change"
        );
    }

    #[test]
    fn test_comparison_csv_row() {
        let rows = vec![ComparisonRow {
            key: DimensionKey::query("shoes"),
            clicks_current: 10,
            clicks_previous: 20,
            impressions_current: 100,
            impressions_previous: 80,
            ctr_current: 0.1,
            ctr_previous: 0.25,
            position_current: 5.0,
            position_previous: 3.0,
            clicks_diff: -10,
            ctr_diff: -0.15,
            impressions_diff: 20,
            position_diff: -2.0,
            clicks_pct_change: -50.0,
        }];
        let out = csv(|w| write_comparison_csv(w, &rows));
        assert_eq!(
            out.lines().nth(1).unwrap(),
            "shoes,10,20,100,80,0.1,0.25,5.0,3.0,-10,-0.15,20,-2.0,-50.0"
        );
    }

    #[test]
    fn test_keys_with_commas_are_quoted() {
        let rows = vec![AggregatedRow {
            key: DimensionKey::query("shoes, red"),
            clicks: 1,
            impressions: 2,
            ctr: 0.5,
            position: 1.0,
        }];
        let out = csv(|w| write_aggregated_csv(w, &rows));
        assert_eq!(out.lines().nth(1).unwrap(), "\"shoes, red\",1,2,0.5,1.0");
    }

    #[test]
    fn test_chart_csv_is_dense() {
        let date = |d| NaiveDate::from_ymd_opt(2024, 4, d);
        let rows = vec![
            MetricRow {
                key: DimensionKey::query("shoes"),
                date: date(1),
                clicks: 5,
                impressions: 50,
                ctr: 0.1,
                position: 5.0,
            },
            MetricRow {
                key: DimensionKey::query("boots"),
                date: date(2),
                clicks: 3,
                impressions: 30,
                ctr: 0.1,
                position: 5.0,
            },
        ];
        let table = pivot_for_chart(&rows).unwrap();
        let out = csv(|w| write_chart_csv(w, &table));
        insta::assert_snapshot!(out.trim_end(), @r"
        date,shoes,boots
        2024-04-01,5,0
        2024-04-02,0,3
        ");
    }

    #[test]
    fn test_raw_csv_keeps_date_and_key() {
        let rows = vec![MetricRow {
            key: DimensionKey::page("https://example.com/a"),
            date: NaiveDate::from_ymd_opt(2024, 4, 1),
            clicks: 12,
            impressions: 340,
            ctr: 0.25,
            position: 7.5,
        }];
        let out = csv(|w| write_raw_csv(w, &rows));
        assert_eq!(
            out.lines().nth(1).unwrap(),
            "2024-04-01,https://example.com/a,12,340,0.25,7.5"
        );
    }

    #[test]
    fn test_daily_csv() {
        let rows = vec![DailyTotal {
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            clicks: 8,
            unique_pages: 2,
        }];
        let out = csv(|w| write_daily_csv(w, &rows));
        assert_eq!(out.lines().nth(1).unwrap(), "2024-04-01,8,2");
    }
}
