use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IntelError, Result};
use crate::metric::{AssetId, MetricPoint};

/// Advertising platform a creative is delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Meta,
    TikTok,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Meta, Platform::TikTok, Platform::YouTube];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Meta => write!(f, "Meta"),
            Platform::TikTok => write!(f, "TikTok"),
            Platform::YouTube => write!(f, "YouTube"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pacing {
    Slow,
    Medium,
    Fast,
}

impl Pacing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pacing::Slow => "slow",
            Pacing::Medium => "medium",
            Pacing::Fast => "fast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceType {
    Voiceover,
    TalkingHead,
    TextOnly,
}

impl VoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceType::Voiceover => "voiceover",
            VoiceType::TalkingHead => "talking-head",
            VoiceType::TextOnly => "text-only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualDensity {
    Low,
    Medium,
    High,
}

impl VisualDensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualDensity::Low => "low",
            VisualDensity::Medium => "medium",
            VisualDensity::High => "high",
        }
    }
}

/// Normalized hook family. Unknown declared hook types map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookCategory {
    Engagement,
    ProblemSolving,
    Narrative,
    Attention,
    Other,
}

impl HookCategory {
    pub const ALL: [HookCategory; 5] = [
        HookCategory::Engagement,
        HookCategory::ProblemSolving,
        HookCategory::Narrative,
        HookCategory::Attention,
        HookCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookCategory::Engagement => "engagement",
            HookCategory::ProblemSolving => "problem-solving",
            HookCategory::Narrative => "narrative",
            HookCategory::Attention => "attention",
            HookCategory::Other => "other",
        }
    }
}

impl fmt::Display for HookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationBucket {
    Short,
    Mid,
    Long,
}

impl DurationBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationBucket::Short => "short",
            DurationBucket::Mid => "mid",
            DurationBucket::Long => "long",
        }
    }
}

/// Creative features as declared by the asset source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeFeatures {
    /// Free-form hook type, e.g. "question" or "before-after".
    pub hook_type: String,
    pub pacing: Pacing,
    pub voice_type: VoiceType,
    pub visual_density: VisualDensity,
    pub duration_seconds: f64,
}

/// Normalized, comparable summary of a creative's declared features.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeFeatureSignature {
    pub asset_id: AssetId,
    pub hook_category: HookCategory,
    pub pacing: Pacing,
    pub voice_type: VoiceType,
    pub visual_density: VisualDensity,
    pub duration_bucket: DurationBucket,
}

/// A creative with its declared features and (date-sorted) metric history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeAsset {
    pub id: AssetId,
    pub name: String,
    pub platform: Platform,
    pub features: CreativeFeatures,
    #[serde(default)]
    pub metrics: Vec<MetricPoint>,
}

/// The set of assets supplied for one clustering run.
///
/// Keeps insertion order and rejects duplicate ids.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetPopulation {
    assets: Vec<CreativeAsset>,
}

impl AssetPopulation {
    pub fn new(assets: Vec<CreativeAsset>) -> Result<Self> {
        let mut seen = HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(IntelError::DuplicateAsset(asset.id.clone()));
            }
        }
        Ok(Self { assets })
    }

    pub fn assets(&self) -> &[CreativeAsset] {
        &self.assets
    }

    pub fn get(&self, id: &str) -> Option<&CreativeAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
