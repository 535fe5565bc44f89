use serde::{Deserialize, Serialize};
use crate::common::LayoutError;

/// Which end of the depth scale is closer to the camera.
///
/// Disparity-style estimators (MiDaS, DPT) output larger values for nearer
/// surfaces; metric depth grows with distance. The compositor paints the
/// farthest object first so the nearest one wins overlaps, so getting this
/// wrong inverts every occlusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthConvention {
    #[serde(alias = "higher", alias = "disparity")]
    NearerHigher,
    #[serde(alias = "lower", alias = "metric")]
    NearerLower,
}

// Accepted spellings, canonical name first.
const NEARER_HIGHER: [&str; 3] = ["nearer_higher", "higher", "disparity"];
const NEARER_LOWER: [&str; 3] = ["nearer_lower", "lower", "metric"];

impl DepthConvention {
    pub fn from_str(convention: &str) -> Option<Self> {
        let convention = convention.to_lowercase();
        if NEARER_HIGHER.contains(&convention.as_str()) {
            Some(DepthConvention::NearerHigher)
        } else if NEARER_LOWER.contains(&convention.as_str()) {
            Some(DepthConvention::NearerLower)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DepthConvention::NearerHigher => NEARER_HIGHER[0],
            DepthConvention::NearerLower => NEARER_LOWER[0],
        }
    }

    /// True if a surface with depth `a` is nearer to the camera than one with depth `b`.
    pub fn is_nearer(&self, a: f32, b: f32) -> bool {
        match self {
            DepthConvention::NearerHigher => a > b,
            DepthConvention::NearerLower => a < b,
        }
    }

    /// Checks the convention against depths measured for a known nearer and farther object.
    pub fn check_reference(&self, pair: &ReferencePair) -> Result<(), LayoutError> {
        if !pair.near.is_finite() || !pair.far.is_finite() || pair.near == pair.far {
            return Err(LayoutError::InvalidDepthConvention(format!(
                "reference pair near={} far={} cannot tell the convention apart",
                pair.near, pair.far
            )));
        }
        if !self.is_nearer(pair.near, pair.far) {
            return Err(LayoutError::InvalidDepthConvention(format!(
                "`{}` contradicts reference pair near={} far={}",
                self.as_str(),
                pair.near,
                pair.far
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for DepthConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth values the estimator produced for two objects whose order is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePair {
    pub near: f32,
    pub far: f32,
}

impl ReferencePair {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }
}
