use drawing::{ConversionParams, DrawingConverter, DrawingError, ExportFormat, NoModelReason, ProcessStatus};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    DrawingError(#[from] DrawingError),
    #[error("Failed to write edge mask: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// One drawing to convert and where its results go
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConversionJob {
    pub name: String,
    /// Drawing to read (PNG or JPEG)
    pub input: String,
    /// Mesh file to write
    pub output: String,
    /// Mesh format; guessed from the output extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    /// Optional PNG of the binarized edge mask
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges_output: Option<String>,
    /// Optional GeoJSON of the traced contours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contours_output: Option<String>,
    #[serde(default)]
    pub params: ConversionParams,
}

impl ConversionJob {
    pub fn new(name: impl Into<String>, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            format: None,
            edges_output: None,
            contours_output: None,
            params: ConversionParams::default(),
        }
    }

    /// Explicit format, else the output extension, else OBJ
    pub fn resolved_format(&self) -> ExportFormat {
        self.format
            .or_else(|| ExportFormat::from_path(&self.output))
            .unwrap_or_default()
    }
}

/// Batch configuration: a list of independent conversion jobs
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BatchConfig {
    pub jobs: Vec<ConversionJob>,
}

impl BatchConfig {
    /// Load BatchConfig configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load BatchConfig configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load BatchConfig configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load BatchConfig configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Auto-detect file format and save configuration
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let content = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(CliError::UnsupportedFileFormat),
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Convert BatchConfig to TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert BatchConfig to JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// A single-job configuration showing every field
    pub fn sample() -> Self {
        Self {
            jobs: vec![ConversionJob {
                format: Some(ExportFormat::Stl),
                edges_output: Some("out/sketch_edges.png".to_string()),
                contours_output: Some("out/sketch_contours.geojson".to_string()),
                ..ConversionJob::new("sketch", "sketch.png", "out/sketch.stl")
            }],
        }
    }
}

/// Result of one job: a written model or the reason no model exists
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Exported {
        path: String,
        format: ExportFormat,
        vertices: usize,
        faces: usize,
    },
    NoModel {
        reason: NoModelReason,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobReport {
    pub name: String,
    pub contours: usize,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

fn ensure_parent(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Run one job to completion on the calling thread
pub fn run_job(job: &ConversionJob) -> Result<JobReport, CliError> {
    job.params.validate()?;

    let mut converter = DrawingConverter::with_params(job.params.clone());
    converter.load_image(&job.input)?;
    let status = converter.process()?;

    if let (Some(path), Some(mask)) = (&job.edges_output, converter.edge_mask()) {
        let path = Path::new(path);
        ensure_parent(path)?;
        mask.save(path)?;
    }

    let contours = converter.contours().map_or(0, |c| c.len());
    if let (Some(path), Some(traced)) = (&job.contours_output, converter.contours()) {
        let path = Path::new(path);
        ensure_parent(path)?;
        traced.save_geojson(path)?;
    }

    let outcome = match status {
        ProcessStatus::ModelGenerated { vertices, faces } => {
            let format = job.resolved_format();
            let path = Path::new(&job.output);
            ensure_parent(path)?;
            converter.export_to_file(path, format)?;
            JobOutcome::Exported {
                path: job.output.clone(),
                format,
                vertices,
                faces,
            }
        }
        ProcessStatus::NoModel(reason) => {
            tracing::warn!(job = %job.name, %reason, "no 3D model to export");
            JobOutcome::NoModel { reason }
        }
    };

    Ok(JobReport {
        name: job.name.clone(),
        contours,
        outcome,
    })
}
