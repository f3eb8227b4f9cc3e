use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IntelError, Result};

/// Identifier of a creative asset as supplied by the asset source.
pub type AssetId = String;

/// One day (or reporting period) of delivery metrics for a creative.
///
/// `ctr` is a percentage (2.5 means 2.5%), `roas` a revenue/spend ratio and
/// `frequency` the average number of exposures per unique viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub asset_id: AssetId,
    pub date: DateTime<Utc>,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub conversions: u64,
    pub roas: f64,
    pub frequency: f64,
}

/// Verify that `metrics` is ascending by date.
///
/// Equal timestamps are allowed; a later point dated before an earlier one is
/// rejected with [`IntelError::UnsortedMetrics`].
pub fn ensure_sorted(metrics: &[MetricPoint]) -> Result<()> {
    for (i, pair) in metrics.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            return Err(IntelError::UnsortedMetrics {
                asset_id: pair[1].asset_id.clone(),
                index: i + 1,
            });
        }
    }
    Ok(())
}

/// Sort metric points ascending by date in place (stable).
pub fn sort_by_date(metrics: &mut [MetricPoint]) {
    metrics.sort_by_key(|m| m.date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(day: u32) -> MetricPoint {
        MetricPoint {
            asset_id: "a1".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            spend: 100.0,
            impressions: 1000,
            clicks: 20,
            ctr: 2.0,
            conversions: 2,
            roas: 3.0,
            frequency: 1.5,
        }
    }

    #[test]
    fn sorted_sequence_passes() {
        assert!(ensure_sorted(&[point(1), point(2), point(2), point(5)]).is_ok());
        assert!(ensure_sorted(&[]).is_ok());
    }

    #[test]
    fn unsorted_sequence_reports_index() {
        let err = ensure_sorted(&[point(1), point(4), point(3)]).unwrap_err();
        match err {
            IntelError::UnsortedMetrics { asset_id, index } => {
                assert_eq!(asset_id, "a1");
                assert_eq!(index, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sort_by_date_orders_points() {
        let mut points = vec![point(3), point(1), point(2)];
        sort_by_date(&mut points);
        assert!(ensure_sorted(&points).is_ok());
        assert_eq!(points[0].date, point(1).date);
    }

    #[test]
    fn deserializes_camel_case() {
        let json = r#"{
            "assetId": "a9", "date": "2024-03-01T00:00:00Z", "spend": 10.0,
            "impressions": 500, "clicks": 5, "ctr": 1.0, "conversions": 1,
            "roas": 2.0, "frequency": 1.1
        }"#;
        let p: MetricPoint = serde_json::from_str(json).unwrap();
        assert_eq!(p.asset_id, "a9");
        assert_eq!(p.impressions, 500);
    }
}
