use std::{io::Write, path::Path};

use crate::{
    config::ConversionParams,
    error::{DrawingError, Result},
    io::ExportFormat,
    mesh::{Mesh, ModelOutcome, NoModelReason},
    pipeline::{Conversion, Pipeline},
    types::{EdgeMask, RasterImage, TracedContours},
};

/// What the last [`DrawingConverter::process`] call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    ModelGenerated { vertices: usize, faces: usize },
    NoModel(NoModelReason),
}

/// Conversion session: one loaded drawing, the current parameters, and the
/// latest edge mask and model derived from them.
#[derive(Debug, Clone, Default)]
pub struct DrawingConverter {
    image: Option<RasterImage>,
    params: ConversionParams,
    edge_mask: Option<EdgeMask>,
    contours: Option<TracedContours>,
    mesh: Option<Mesh>,
    /// Why the last successful run produced no model
    no_model: Option<NoModelReason>,
}

impl DrawingConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: ConversionParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Load a drawing from file
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let img = image::open(path)?;
        self.set_image(img.to_rgba8());
        Ok(())
    }

    /// Load a drawing from encoded bytes (PNG, JPEG)
    pub fn load_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let img = image::load_from_memory(bytes)?;
        self.set_image(img.to_rgba8());
        Ok(())
    }

    /// Set the drawing directly. Results derived from the previous drawing are dropped.
    pub fn set_image(&mut self, image: RasterImage) {
        tracing::debug!(width = image.width(), height = image.height(), "image loaded");
        self.image = Some(image);
        self.edge_mask = None;
        self.contours = None;
        self.mesh = None;
        self.no_model = None;
    }

    pub fn image(&self) -> Option<&RasterImage> {
        self.image.as_ref()
    }

    pub fn params(&self) -> &ConversionParams {
        &self.params
    }

    pub fn set_params(&mut self, params: ConversionParams) {
        self.params = params;
    }

    /// Run the pipeline on the loaded drawing and replace the current model.
    pub fn process(&mut self) -> Result<ProcessStatus> {
        let image = self.image.as_ref().ok_or(DrawingError::NoImageLoaded)?;
        let Conversion {
            edge_mask,
            contours,
            outcome,
        } = Pipeline::new(self.params.clone()).process(image)?;

        self.edge_mask = Some(edge_mask);
        self.contours = Some(contours);

        let status = match outcome {
            ModelOutcome::Generated(mesh) => {
                let status = ProcessStatus::ModelGenerated {
                    vertices: mesh.vertex_count(),
                    faces: mesh.face_count(),
                };
                self.mesh = Some(mesh);
                self.no_model = None;
                status
            }
            ModelOutcome::NoModel(reason) => {
                self.mesh = None;
                self.no_model = Some(reason);
                ProcessStatus::NoModel(reason)
            }
        };
        Ok(status)
    }

    pub fn edge_mask(&self) -> Option<&EdgeMask> {
        self.edge_mask.as_ref()
    }

    pub fn contours(&self) -> Option<&TracedContours> {
        self.contours.as_ref()
    }

    pub fn current_mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    fn require_mesh(&self) -> Result<&Mesh> {
        match (&self.mesh, self.no_model) {
            (Some(mesh), _) => Ok(mesh),
            (None, Some(reason)) => Err(DrawingError::NoModel(reason)),
            (None, None) if self.image.is_none() => Err(DrawingError::NoImageLoaded),
            (None, None) => Err(DrawingError::NotProcessed),
        }
    }

    /// Write the current model; fails with [`DrawingError::NoModel`] when there is none.
    pub fn export(&self, format: ExportFormat, writer: &mut dyn Write) -> Result<()> {
        self.require_mesh()?.write_to(format, writer)
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
        self.require_mesh()?.save(path, format)
    }
}
