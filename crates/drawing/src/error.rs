use thiserror::Error;

use crate::mesh::NoModelReason;

#[derive(Error, Debug)]
pub enum DrawingError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Malformed raster: buffer of {len} bytes does not match {width}x{height} RGBA")]
    MalformedInput { width: u32, height: u32, len: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No conversion has been run for the loaded image")]
    NotProcessed,

    #[error("No model available: {0}")]
    NoModel(NoModelReason),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, DrawingError>;
