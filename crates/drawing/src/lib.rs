//! # Drawing to 3D Model Library
//!
//! Turns a raster line drawing into an extruded, bevelled triangle mesh.
//! Edges are detected on a smoothed luminance buffer, binarized, traced into
//! contours, and the dominant contour is swept into a solid.
//!
//! ## Core Features
//!
//! - **Edge Operators**: Sobel, a simplified Canny-style classifier, and Laplacian
//! - **Contour Tracing**: Moore-neighbour boundary following over the edge mask
//! - **Extrusion**: Bevelled solids with triangulated caps and smooth normals
//! - **Export**: OBJ, STL (ASCII and binary), PLY, and GeoJSON for contours
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drawing::{ExportFormat, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .algorithm_name("canny")
//!     .threshold(80)
//!     .depth(30.0)
//!     .build();
//!
//! let raster = image::open("sketch.png")?.to_rgba8();
//! let conversion = pipeline.process(&raster)?;
//!
//! if let Some(mesh) = conversion.outcome.mesh() {
//!     mesh.save("sketch.obj", ExportFormat::Obj)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Session
//!
//! ```rust,no_run
//! use drawing::{DrawingConverter, ExportFormat, ProcessStatus};
//!
//! let mut converter = DrawingConverter::new();
//! converter.load_image("sketch.png")?;
//! if let ProcessStatus::ModelGenerated { faces, .. } = converter.process()? {
//!     println!("{faces} faces");
//!     converter.export_to_file("sketch.stl", ExportFormat::StlBinary)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod mesh;
pub mod pipeline;
pub mod io;
pub mod converter;

// Re-exports for convenience
pub use error::{DrawingError, Result};
pub use types::{Contour, EdgeMask, LuminanceBuffer, Point, RasterImage, TracedContours, raster_from_raw};
pub use config::{ConversionParams, EdgeAlgorithm, ExtrusionSettings};
pub use traits::MeshExporter;
pub use mesh::{Material, Mesh, ModelOutcome, NoModelReason, Shape, build_model};
pub use pipeline::{Conversion, Pipeline, builder::PipelineBuilder};
pub use io::ExportFormat;
pub use converter::{DrawingConverter, ProcessStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn test_outline_drawing_to_stl() {
        let mut raster = RasterImage::from_pixel(80, 60, Rgba([250, 250, 250, 255]));
        for inset in 0..3 {
            draw_hollow_rect_mut(
                &mut raster,
                Rect::at(20 + inset, 15 + inset).of_size(40 - 2 * inset as u32, 30 - 2 * inset as u32),
                Rgba([10, 10, 10, 255]),
            );
        }

        let conversion = Pipeline::builder().blur(1.5).build().process(&raster).unwrap();
        let mesh = conversion.outcome.into_mesh().expect("outline should produce a model");
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert!(mesh.faces.iter().flatten().all(|&i| (i as usize) < mesh.vertex_count()));

        let stl = mesh.to_bytes(ExportFormat::StlBinary).unwrap();
        assert_eq!(stl.len(), 84 + 50 * mesh.face_count());
    }

    #[test]
    fn test_geojson_of_traced_contours() {
        let mut raster = RasterImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        draw_hollow_rect_mut(&mut raster, Rect::at(10, 10).of_size(20, 20), Rgba([0, 0, 0, 255]));

        let conversion = PipelineBuilder::build_simple(100, 10.0).process(&raster).unwrap();
        let collection = conversion.contours.to_geojson();
        assert_eq!(collection.features.len(), conversion.contours.len());
        assert!(!collection.features.is_empty());
    }
}
