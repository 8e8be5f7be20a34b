pub mod builder;

pub use builder::PipelineBuilder;

use image::RgbaImage;

use crate::{
    algorithms::{binarize, find_contours, gaussian_blur, to_grayscale},
    config::ConversionParams,
    error::Result,
    mesh::{ModelOutcome, build_model},
    types::{EdgeMask, TracedContours, raster_from_raw},
};

/// Everything one conversion produces for the display and export layers.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Binarized edge map, same size as the input raster
    pub edge_mask: EdgeMask,
    pub contours: TracedContours,
    pub outcome: ModelOutcome,
}

/// Raster to mesh conversion: grayscale, blur, edge detection, threshold,
/// contour tracing and extrusion, run strictly in that order.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    params: ConversionParams,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(params: ConversionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ConversionParams {
        &self.params
    }

    /// Edge stages only: the binarized mask shown to the user.
    pub fn detect_edges(&self, raster: &RgbaImage) -> EdgeMask {
        let gray = to_grayscale(raster);
        let blurred = gaussian_blur(&gray, self.params.blur);
        let edges = self.params.algorithm.apply(&blurred, self.params.threshold);
        binarize(&edges, self.params.threshold)
    }

    /// Process an image through the entire pipeline.
    ///
    /// Only an unbounded blur or invalid extrusion settings fail; a drawing without a usable
    /// outline is reported through [`Conversion::outcome`].
    pub fn process(&self, raster: &RgbaImage) -> Result<Conversion> {
        self.params.validate_blur()?;
        self.params.extrusion.validate()?;
        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            algorithm = %self.params.algorithm,
            threshold = self.params.threshold,
            blur = self.params.blur,
            "processing raster"
        );

        let edge_mask = self.detect_edges(raster);
        let contours = find_contours(&edge_mask);
        let outcome = build_model(&contours, &self.params.extrusion);

        Ok(Conversion {
            edge_mask,
            contours,
            outcome,
        })
    }

    /// Validate a raw RGBA buffer against its dimensions, then process it.
    pub fn process_raw(&self, width: u32, height: u32, data: Vec<u8>) -> Result<Conversion> {
        let raster = raster_from_raw(width, height, data)?;
        self.process(&raster)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} edges, threshold {}, blur {}, depth {}{}",
            self.params.algorithm,
            self.params.threshold,
            self.params.blur,
            self.params.extrusion.depth,
            if self.params.extrusion.bevel_enabled { ", bevelled" } else { "" }
        )
    }
}
