use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value, feature::Id};
use serde_json::{Map, Number, json};

use crate::{
    error::{DrawingError, Result},
    mesh::Shape,
    types::{Contour, Point, TracedContours},
};

fn position(p: &Point) -> Vec<f64> {
    vec![f64::from(p.x), f64::from(p.y)]
}

/// Whole, non-negative coordinates that fit a `u32`.
fn pixel(v: f64) -> Option<u32> {
    (v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v)).then_some(v as u32)
}

/// Polygon for closable contours, LineString otherwise. Pixel coordinates.
fn contour_geometry(contour: &Contour) -> Geometry {
    let mut ring: Vec<Vec<f64>> = contour.points.iter().map(position).collect();
    if contour.len() >= Shape::MIN_POINTS {
        ring.push(position(&contour.points[0]));
        Geometry::new(Value::Polygon(vec![ring]))
    } else {
        Geometry::new(Value::LineString(ring))
    }
}

fn contour_properties(id: usize, contour: &Contour) -> Map<String, serde_json::Value> {
    let mut properties = Map::new();
    properties.insert("id".to_string(), json!(id));
    properties.insert("point_count".to_string(), json!(contour.len()));
    properties.insert(
        "perimeter".to_string(),
        Number::from_f64(f64::from(contour.perimeter()))
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
    );
    if let Some((min, max)) = contour.bounding_box() {
        properties.insert("bbox".to_string(), json!([min.x, min.y, max.x, max.y]));
    }
    properties
}

impl TracedContours {
    /// Export the traced contours as a FeatureCollection in pixel space
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .contours
            .iter()
            .enumerate()
            .map(|(i, contour)| Feature {
                bbox: None,
                geometry: Some(contour_geometry(contour)),
                id: Some(Id::Number(Number::from(i))),
                properties: Some(contour_properties(i, contour)),
                foreign_members: None,
            })
            .collect();

        let mut foreign_members = Map::new();
        foreign_members.insert("image_width".to_string(), json!(self.image_width));
        foreign_members.insert("image_height".to_string(), json!(self.image_height));
        foreign_members.insert("contour_count".to_string(), json!(self.contours.len()));

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    /// Save to GeoJSON file
    pub fn save_geojson(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }

    /// Read contours back from a FeatureCollection written by [`Self::to_geojson`].
    pub fn from_geojson_str(s: &str) -> Result<Self> {
        let GeoJson::FeatureCollection(collection) = s.parse::<GeoJson>()? else {
            return Err(DrawingError::InvalidParameter(
                "expected a GeoJSON FeatureCollection".to_string(),
            ));
        };

        let dimension = |key: &str| {
            collection
                .foreign_members
                .as_ref()
                .and_then(|members| members.get(key))
                .and_then(serde_json::Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| DrawingError::InvalidParameter(format!("missing {key}")))
        };
        let image_width = dimension("image_width")?;
        let image_height = dimension("image_height")?;

        let contours = collection
            .features
            .iter()
            .map(|feature| {
                let positions = match feature.geometry.as_ref().map(|g| &g.value) {
                    Some(Value::Polygon(rings)) => {
                        let mut ring = rings.first().cloned().unwrap_or_default();
                        // drop the closing position
                        ring.pop();
                        ring
                    }
                    Some(Value::LineString(line)) => line.clone(),
                    _ => {
                        return Err(DrawingError::InvalidParameter(
                            "contour features must be Polygon or LineString".to_string(),
                        ));
                    }
                };
                let points = positions
                    .iter()
                    .map(|p| match p.as_slice() {
                        [x, y, ..] => match (pixel(*x), pixel(*y)) {
                            (Some(x), Some(y)) => Ok(Point::new(x, y)),
                            _ => Err(DrawingError::InvalidParameter(format!(
                                "contour position [{x}, {y}] is not a pixel coordinate"
                            ))),
                        },
                        _ => Err(DrawingError::InvalidParameter(
                            "contour positions need two coordinates".to_string(),
                        )),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Contour::new(points))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            contours,
            image_width,
            image_height,
        })
    }
}
