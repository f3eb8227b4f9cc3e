//! Analyzers for the creative intelligence engine: fatigue detection,
//! signature clustering, strategy recommendation and playbook matching.

pub mod clustering;
pub mod engine;
pub mod fatigue;
pub mod playbook;
pub mod signature;
pub mod store;
pub mod strategy;

pub use clustering::ClusteringEngine;
pub use engine::{ClusterReport, IntelEngine, IntelReport, PlatformSummary};
pub use fatigue::{FatigueDetector, FatigueModel};
pub use playbook::{PlaybookMatcher, ScenarioQuery};
pub use signature::{SignatureBuilder, SignatureKey};
pub use store::{AssetFixture, InMemoryMetricStore, MetricSource};
pub use strategy::{PlatformSignals, StrategyEngine, StrategyModel};
