use crate::{
    config::{ConversionParams, EdgeAlgorithm, ExtrusionSettings},
    pipeline::Pipeline,
};

/// Builder for creating processing pipelines with a fluent API
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    params: ConversionParams,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete parameter set
    pub fn params(mut self, params: ConversionParams) -> Self {
        self.params = params;
        self
    }

    pub fn algorithm(mut self, algorithm: EdgeAlgorithm) -> Self {
        self.params.algorithm = algorithm;
        self
    }

    /// Select the edge operator by name; unknown names select Sobel
    pub fn algorithm_name(self, name: &str) -> Self {
        self.algorithm(EdgeAlgorithm::from_name(name))
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.params.threshold = threshold;
        self
    }

    /// Gaussian sigma; 0 disables smoothing
    pub fn blur(mut self, sigma: f32) -> Self {
        self.params.blur = sigma;
        self
    }

    pub fn depth(mut self, depth: f32) -> Self {
        self.params.extrusion.depth = depth;
        self
    }

    pub fn extrusion(mut self, extrusion: ExtrusionSettings) -> Self {
        self.params.extrusion = extrusion;
        self
    }

    pub fn without_bevel(mut self) -> Self {
        self.params.extrusion.bevel_enabled = false;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline::new(self.params)
    }

    /// Sobel edges, no smoothing, flat extrusion
    pub fn build_simple(threshold: u8, depth: f32) -> Pipeline {
        Self::new()
            .threshold(threshold)
            .blur(0.0)
            .depth(depth)
            .without_bevel()
            .build()
    }
}
