use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use ts_rs::TS;

use crate::error::{DrawingError, Result};

/// Edge operator applied to the blurred luminance buffer.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, JsonSchema, TS,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[ts(export)]
pub enum EdgeAlgorithm {
    /// 3x3 gradient magnitude
    #[default]
    Sobel,
    /// Sobel followed by per-pixel strong/weak classification. No
    /// non-maximum suppression and no edge linking.
    Canny,
    /// 3x3 absolute Laplacian
    Laplacian,
}

impl EdgeAlgorithm {
    /// Parse an algorithm identifier; anything unrecognized selects Sobel.
    pub fn from_name(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            tracing::debug!(name, "unrecognized edge algorithm, using sobel");
            Self::Sobel
        })
    }

    pub fn names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }
}

impl<'de> Deserialize<'de> for EdgeAlgorithm {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Solid extrusion parameters. Only `depth` is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(default)]
#[ts(export)]
pub struct ExtrusionSettings {
    #[schemars(description = "Extrusion depth along Z in model units")]
    pub depth: f32,
    pub bevel_enabled: bool,
    #[schemars(description = "Outward offset of the bevelled rim")]
    pub bevel_size: f32,
    #[schemars(description = "Z extent of each bevel, added beyond the depth")]
    pub bevel_thickness: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
    #[schemars(description = "Longitudinal subdivisions of the extruded body")]
    pub steps: u32,
}

impl Default for ExtrusionSettings {
    fn default() -> Self {
        Self {
            depth: 50.0,
            bevel_enabled: true,
            bevel_size: 2.0,
            bevel_thickness: 2.0,
            bevel_offset: 0.0,
            bevel_segments: 2,
            steps: 2,
        }
    }
}

impl ExtrusionSettings {
    pub fn with_depth(depth: f32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn without_bevel(mut self) -> Self {
        self.bevel_enabled = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.depth.is_finite() || self.depth <= 0.0 {
            return Err(DrawingError::InvalidParameter(format!(
                "extrusion depth must be positive, got {}",
                self.depth
            )));
        }
        Ok(())
    }
}

/// Everything one conversion request needs besides the raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(default)]
#[ts(export)]
pub struct ConversionParams {
    pub algorithm: EdgeAlgorithm,
    #[schemars(range(min = 10, max = 255))]
    pub threshold: u8,
    #[schemars(description = "Gaussian sigma, 0 disables smoothing", range(min = 0.0, max = 5.0))]
    pub blur: f32,
    pub extrusion: ExtrusionSettings,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            algorithm: EdgeAlgorithm::Sobel,
            threshold: 100,
            blur: 1.0,
            extrusion: ExtrusionSettings::default(),
        }
    }
}

impl ConversionParams {
    pub const MIN_THRESHOLD: u8 = 10;
    pub const MAX_BLUR: f32 = 5.0;

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.extrusion.depth = depth;
        self
    }

    /// Blur must be finite and at most [`Self::MAX_BLUR`]; non-positive sigma disables smoothing.
    pub fn validate_blur(&self) -> Result<()> {
        if !self.blur.is_finite() || self.blur > Self::MAX_BLUR {
            return Err(DrawingError::InvalidParameter(format!(
                "blur must be finite and at most {}, got {}",
                Self::MAX_BLUR,
                self.blur
            )));
        }
        Ok(())
    }

    /// Check the ranges exposed to users. The pipeline itself only needs a
    /// bounded blur and a positive depth.
    pub fn validate(&self) -> Result<()> {
        if self.threshold < Self::MIN_THRESHOLD {
            return Err(DrawingError::InvalidParameter(format!(
                "threshold must be in [{}, 255], got {}",
                Self::MIN_THRESHOLD,
                self.threshold
            )));
        }
        if !self.blur.is_finite() || !(0.0..=Self::MAX_BLUR).contains(&self.blur) {
            return Err(DrawingError::InvalidParameter(format!(
                "blur must be in [0, {}], got {}",
                Self::MAX_BLUR,
                self.blur
            )));
        }
        self.extrusion.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_algorithm_falls_back_to_sobel() {
        assert_eq!(EdgeAlgorithm::from_name("canny"), EdgeAlgorithm::Canny);
        assert_eq!(EdgeAlgorithm::from_name("Laplacian"), EdgeAlgorithm::Laplacian);
        assert_eq!(EdgeAlgorithm::from_name("prewitt"), EdgeAlgorithm::Sobel);
        assert_eq!(EdgeAlgorithm::from_name(""), EdgeAlgorithm::Sobel);
    }

    #[test]
    fn test_algorithm_serde_uses_lowercase_and_falls_back() {
        assert_eq!(serde_json::to_string(&EdgeAlgorithm::Laplacian).unwrap(), "\"laplacian\"");
        let parsed: EdgeAlgorithm = serde_json::from_str("\"roberts\"").unwrap();
        assert_eq!(parsed, EdgeAlgorithm::Sobel);
        assert_eq!(EdgeAlgorithm::names(), &["sobel", "canny", "laplacian"]);
    }

    #[test]
    fn test_partial_params_fill_defaults() {
        let params: ConversionParams =
            serde_json::from_str(r#"{"algorithm": "canny", "extrusion": {"depth": 80}}"#).unwrap();
        assert_eq!(params.algorithm, EdgeAlgorithm::Canny);
        assert_eq!(params.threshold, 100);
        assert_eq!(params.extrusion.depth, 80.0);
        assert!(params.extrusion.bevel_enabled);
        assert_eq!(params.extrusion.bevel_segments, 2);
    }

    #[test]
    fn test_validation() {
        assert!(ConversionParams::default().validate().is_ok());
        assert!(ConversionParams::default().with_depth(0.0).validate().is_err());
        assert!(ConversionParams::default().with_depth(f32::NAN).validate().is_err());

        let low_threshold = ConversionParams { threshold: 5, ..Default::default() };
        assert!(low_threshold.validate().is_err());

        let heavy_blur = ConversionParams { blur: 7.5, ..Default::default() };
        assert!(heavy_blur.validate().is_err());

        assert!(ExtrusionSettings::with_depth(-1.0).validate().is_err());
    }
}
