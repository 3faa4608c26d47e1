//! Collapse a fetch into one row per distinct dimension key.
//!
//! Volume metrics (clicks, impressions) are summed. Rate metrics (ctr,
//! position) are unweighted arithmetic means across the rows that
//! contributed to the key. The unweighted mean under-weights
//! high-traffic days; that matches the source reports this crate
//! replaces and is kept deliberately.

use std::collections::HashMap;

use crate::model::{AggregatedRow, DimensionKey, MetricRow};

struct Accum {
    clicks: u64,
    impressions: u64,
    ctr_sum: f64,
    position_sum: f64,
    count: u32,
}

impl Accum {
    fn new() -> Self {
        Accum {
            clicks: 0,
            impressions: 0,
            ctr_sum: 0.0,
            position_sum: 0.0,
            count: 0,
        }
    }

    fn push(&mut self, row: &MetricRow) {
        self.clicks += row.clicks;
        self.impressions += row.impressions;
        self.ctr_sum += row.ctr;
        self.position_sum += row.position;
        self.count += 1;
    }

    fn finish(self, key: DimensionKey) -> AggregatedRow {
        let n = f64::from(self.count);
        AggregatedRow {
            key,
            clicks: self.clicks,
            impressions: self.impressions,
            ctr: self.ctr_sum / n,
            position: self.position_sum / n,
        }
    }
}

/// Group `rows` by exact key equality and reduce each group.
///
/// Empty input yields empty output. Output order follows first
/// appearance of each key in the input, but callers that need an order
/// must sort explicitly; the order here is not part of the contract.
pub fn aggregate(rows: &[MetricRow]) -> Vec<AggregatedRow> {
    let mut order: Vec<DimensionKey> = Vec::new();
    let mut groups: HashMap<DimensionKey, Accum> = HashMap::new();

    for row in rows {
        groups
            .entry(row.key.clone())
            .or_insert_with(|| {
                order.push(row.key.clone());
                Accum::new()
            })
            .push(row);
    }

    order
        .into_iter()
        .map(|key| {
            // Every key in `order` was inserted into `groups` above.
            let accum = groups.remove(&key).unwrap_or_else(Accum::new);
            accum.finish(key)
        })
        .collect()
}
