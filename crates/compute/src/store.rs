//! Metric history access.
//!
//! The analyzers only ever see date-sorted slices. [`InMemoryMetricStore`]
//! keeps each asset's history sorted on insert so callers feeding it raw
//! rows in arbitrary order still satisfy that precondition.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::debug;

use creative_core::{
    sort_by_date, AssetId, AssetPopulation, CreativeAsset, MetricPoint, Result,
};

/// Read access to per-asset metric history, oldest point first.
pub trait MetricSource: Send + Sync {
    /// Date-sorted history for one asset. Unknown assets yield an empty history.
    fn metrics_for(&self, asset_id: &str) -> Vec<MetricPoint>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMetricStore {
    points: HashMap<AssetId, Vec<MetricPoint>>,
}

impl InMemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = MetricPoint>) -> Self {
        let mut store = Self::new();
        store.extend(points);
        store
    }

    pub fn insert(&mut self, point: MetricPoint) {
        let history = self.points.entry(point.asset_id.clone()).or_default();
        history.push(point);
        sort_by_date(history);
    }

    /// Bulk insert; each touched history is re-sorted once.
    pub fn extend(&mut self, points: impl IntoIterator<Item = MetricPoint>) {
        let mut touched = HashSet::new();
        for point in points {
            touched.insert(point.asset_id.clone());
            self.points.entry(point.asset_id.clone()).or_default().push(point);
        }
        for id in touched {
            if let Some(history) = self.points.get_mut(&id) {
                sort_by_date(history);
            }
        }
    }

    pub fn asset_ids(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.points.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Replace each asset's metrics with the stored history.
    pub fn attach(&self, assets: &mut [CreativeAsset]) {
        for asset in assets.iter_mut() {
            asset.metrics = self.metrics_for(&asset.id);
        }
    }
}

impl MetricSource for InMemoryMetricStore {
    fn metrics_for(&self, asset_id: &str) -> Vec<MetricPoint> {
        self.points.get(asset_id).cloned().unwrap_or_default()
    }
}

/// Asset definitions plus raw metric rows, as stored in a fixture file.
///
/// ```json
/// { "assets": [{ "id": "...", "platform": "Meta", "features": { ... } }],
///   "metrics": [{ "assetId": "...", "date": "2024-05-01T00:00:00Z", ... }] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFixture {
    pub assets: Vec<CreativeAsset>,
    #[serde(default)]
    pub metrics: Vec<MetricPoint>,
}

impl AssetFixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merge the metric rows into the assets and build a population.
    ///
    /// Metrics embedded inline on an asset are kept alongside the rows.
    pub fn into_population(self) -> Result<AssetPopulation> {
        let AssetFixture { mut assets, metrics } = self;
        let inline = assets.iter_mut().flat_map(|a| std::mem::take(&mut a.metrics));
        let store = InMemoryMetricStore::from_points(inline.chain(metrics).collect::<Vec<_>>());
        store.attach(&mut assets);
        debug!(assets = assets.len(), points = store.len(), "fixture loaded");
        AssetPopulation::new(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use creative_core::ensure_sorted;

    fn point(asset: &str, day: u32, roas: f64) -> MetricPoint {
        MetricPoint {
            asset_id: asset.to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap(),
            spend: 100.0,
            impressions: 10_000,
            clicks: 200,
            ctr: 2.0,
            conversions: 10,
            roas,
            frequency: 1.5,
        }
    }

    #[test]
    fn insert_keeps_history_sorted() {
        let mut store = InMemoryMetricStore::new();
        store.insert(point("a", 3, 3.0));
        store.insert(point("a", 1, 1.0));
        store.insert(point("a", 2, 2.0));

        let history = store.metrics_for("a");
        assert!(ensure_sorted(&history).is_ok());
        let roas: Vec<f64> = history.iter().map(|p| p.roas).collect();
        assert_eq!(roas, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn extend_sorts_each_asset() {
        let store = InMemoryMetricStore::from_points(vec![
            point("a", 2, 2.0),
            point("b", 5, 5.0),
            point("a", 1, 1.0),
            point("b", 4, 4.0),
        ]);
        assert_eq!(store.len(), 4);
        assert!(ensure_sorted(&store.metrics_for("a")).is_ok());
        assert!(ensure_sorted(&store.metrics_for("b")).is_ok());
    }

    #[test]
    fn unknown_asset_has_empty_history() {
        let store = InMemoryMetricStore::new();
        assert!(store.metrics_for("missing").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn fixture_merges_rows_into_assets() {
        let json = r#"{
            "assets": [{
                "id": "a",
                "name": "Asset A",
                "platform": "TikTok",
                "features": {
                    "hookType": "question",
                    "pacing": "fast",
                    "voiceType": "talking-head",
                    "visualDensity": "high",
                    "durationSeconds": 12
                }
            }],
            "metrics": [
                {"assetId": "a", "date": "2024-05-02T00:00:00Z", "spend": 1, "impressions": 1,
                 "clicks": 0, "ctr": 1.0, "conversions": 0, "roas": 2.0, "frequency": 1.0},
                {"assetId": "a", "date": "2024-05-01T00:00:00Z", "spend": 1, "impressions": 1,
                 "clicks": 0, "ctr": 1.0, "conversions": 0, "roas": 1.0, "frequency": 1.0}
            ]
        }"#;
        let population = AssetFixture::from_json(json).unwrap().into_population().unwrap();
        let asset = population.get("a").unwrap();
        assert_eq!(asset.metrics.len(), 2);
        assert_eq!(asset.metrics[0].roas, 1.0);
    }
}
