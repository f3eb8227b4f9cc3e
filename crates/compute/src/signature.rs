//! Feature signatures and the grouping key derived from them.

use std::collections::BTreeSet;

use sha2::{Digest, Sha256};

use creative_core::{
    CreativeAsset, CreativeFeatureSignature, CreativeFeatures, DurationBucket, HookCategory,
    Pacing, VisualDensity, VoiceType,
};
use creative_rules::cluster_config::Discriminator;
use creative_rules::signature_config::CompiledSignatureConfig;

/// Normalizes declared creative features into comparable signatures.
#[derive(Debug, Clone, Default)]
pub struct SignatureBuilder {
    config: CompiledSignatureConfig,
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CompiledSignatureConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn build_signature(&self, asset_id: &str, features: &CreativeFeatures) -> CreativeFeatureSignature {
        CreativeFeatureSignature {
            asset_id: asset_id.to_string(),
            hook_category: self.config.hook_category(&features.hook_type),
            pacing: features.pacing,
            voice_type: features.voice_type,
            visual_density: features.visual_density,
            duration_bucket: self.duration_bucket(features.duration_seconds),
        }
    }

    pub fn for_asset(&self, asset: &CreativeAsset) -> CreativeFeatureSignature {
        self.build_signature(&asset.id, &asset.features)
    }

    /// Bucket a duration; bounds are inclusive and anything past `mid` is long.
    pub fn duration_bucket(&self, seconds: f64) -> DurationBucket {
        let buckets = &self.config.duration_buckets;
        if seconds <= buckets.short_max_seconds {
            DurationBucket::Short
        } else if seconds <= buckets.mid_max_seconds {
            DurationBucket::Mid
        } else {
            DurationBucket::Long
        }
    }
}

/// The part of a signature that decides cluster membership.
///
/// Hook category and pacing always participate; the configured secondary
/// discriminators add their field, the rest stay `None`. Field order gives
/// clusters a stable ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureKey {
    pub hook_category: HookCategory,
    pub pacing: Pacing,
    pub voice_type: Option<VoiceType>,
    pub visual_density: Option<VisualDensity>,
    pub duration_bucket: Option<DurationBucket>,
}

impl SignatureKey {
    pub fn from_signature(signature: &CreativeFeatureSignature, discriminators: &[Discriminator]) -> Self {
        let mut key = Self {
            hook_category: signature.hook_category,
            pacing: signature.pacing,
            voice_type: None,
            visual_density: None,
            duration_bucket: None,
        };
        for discriminator in discriminators {
            match discriminator {
                Discriminator::VoiceType => key.voice_type = Some(signature.voice_type),
                Discriminator::VisualDensity => key.visual_density = Some(signature.visual_density),
                Discriminator::DurationBucket => key.duration_bucket = Some(signature.duration_bucket),
            }
        }
        key
    }

    /// `field:value` labels for every participating field.
    pub fn defining_features(&self) -> BTreeSet<String> {
        let mut features = BTreeSet::new();
        features.insert(format!("hook:{}", self.hook_category.as_str()));
        features.insert(format!("pacing:{}", self.pacing.as_str()));
        if let Some(voice) = self.voice_type {
            features.insert(format!("voice:{}", voice.as_str()));
        }
        if let Some(density) = self.visual_density {
            features.insert(format!("density:{}", density.as_str()));
        }
        if let Some(bucket) = self.duration_bucket {
            features.insert(format!("duration:{}", bucket.as_str()));
        }
        features
    }

    /// Dotted canonical form, e.g. `problem-solving.fast`.
    pub fn slug(&self) -> String {
        let mut parts = vec![self.hook_category.as_str(), self.pacing.as_str()];
        parts.extend(self.voice_type.map(|v| v.as_str()));
        parts.extend(self.visual_density.map(|d| d.as_str()));
        parts.extend(self.duration_bucket.map(|b| b.as_str()));
        parts.join(".")
    }

    /// Stable identifier: `cl-` plus the first 6 bytes of the slug's SHA-256.
    pub fn cluster_id(&self) -> String {
        let digest = Sha256::digest(self.slug().as_bytes());
        let hex: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
        format!("cl-{hex}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(hook: &str, duration: f64) -> CreativeFeatures {
        CreativeFeatures {
            hook_type: hook.to_string(),
            pacing: Pacing::Fast,
            voice_type: VoiceType::TalkingHead,
            visual_density: VisualDensity::High,
            duration_seconds: duration,
        }
    }

    #[test]
    fn known_hooks_map_to_categories() {
        let builder = SignatureBuilder::new();
        let sig = builder.build_signature("a", &features("problem-solution", 15.0));
        assert_eq!(sig.hook_category, HookCategory::ProblemSolving);
        assert_eq!(sig.pacing, Pacing::Fast);
        assert_eq!(sig.duration_bucket, DurationBucket::Short);

        let sig = builder.build_signature("b", &features("Before After", 30.0));
        assert_eq!(sig.hook_category, HookCategory::ProblemSolving);
    }

    #[test]
    fn unknown_hook_maps_to_other() {
        let sig = SignatureBuilder::new().build_signature("a", &features("asmr-whisper", 15.0));
        assert_eq!(sig.hook_category, HookCategory::Other);
    }

    #[test]
    fn duration_bucket_bounds_are_inclusive() {
        let builder = SignatureBuilder::new();
        assert_eq!(builder.duration_bucket(0.0), DurationBucket::Short);
        assert_eq!(builder.duration_bucket(20.0), DurationBucket::Short);
        assert_eq!(builder.duration_bucket(20.5), DurationBucket::Mid);
        assert_eq!(builder.duration_bucket(45.0), DurationBucket::Mid);
        assert_eq!(builder.duration_bucket(45.1), DurationBucket::Long);
    }

    #[test]
    fn signature_is_deterministic() {
        let builder = SignatureBuilder::new();
        let f = features("question", 12.0);
        assert_eq!(builder.build_signature("a", &f), builder.build_signature("a", &f));
    }

    #[test]
    fn key_ignores_fields_without_discriminators() {
        let builder = SignatureBuilder::new();
        let short = builder.build_signature("a", &features("question", 10.0));
        let long = builder.build_signature("b", &features("quiz", 90.0));

        let a = SignatureKey::from_signature(&short, &[]);
        let b = SignatureKey::from_signature(&long, &[]);
        assert_eq!(a, b);
        assert_eq!(a.cluster_id(), b.cluster_id());

        let a = SignatureKey::from_signature(&short, &[Discriminator::DurationBucket]);
        let b = SignatureKey::from_signature(&long, &[Discriminator::DurationBucket]);
        assert_ne!(a, b);
        assert_ne!(a.cluster_id(), b.cluster_id());
    }

    #[test]
    fn key_labels_and_slug() {
        let sig = SignatureBuilder::new().build_signature("a", &features("demo", 30.0));
        let key = SignatureKey::from_signature(&sig, &[Discriminator::VoiceType]);
        assert_eq!(key.slug(), "problem-solving.fast.talking-head");
        let labels: Vec<String> = key.defining_features().into_iter().collect();
        assert_eq!(labels, vec!["hook:problem-solving", "pacing:fast", "voice:talking-head"]);
        assert!(key.cluster_id().starts_with("cl-"));
        assert_eq!(key.cluster_id().len(), 15);
    }
}
