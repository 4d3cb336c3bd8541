//! Area definitions in world coordinates.

use image::Rgba;
use serde::{Deserialize, Serialize};

use super::AreaError;
use crate::coord::WorldCoord;

/// A straight border line between two world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment(pub WorldCoord, pub WorldCoord);

impl Segment {
    pub const fn new(start: WorldCoord, end: WorldCoord) -> Self {
        Self(start, end)
    }

    pub fn start(&self) -> WorldCoord {
        self.0
    }

    pub fn end(&self) -> WorldCoord {
        self.1
    }
}

/// A bordered, filled rectilinear region.
///
/// Borders are given as separate horizontal (constant y) and vertical
/// (constant x) segments. `vertices` are the region's corners; they take
/// part in the bounding box but are not drawn on their own.
///
/// In JSON, colors are `[r, g, b, a]` arrays:
///
/// ```json
/// {
///   "vertices": [{"x": 0, "y": 0}, {"x": 32, "y": 16}],
///   "horizontal": [[{"x": 0, "y": 0}, {"x": 32, "y": 0}]],
///   "vertical": [[{"x": 0, "y": 0}, {"x": 0, "y": 16}]],
///   "borderColor": [255, 0, 0, 255],
///   "fillColor": [255, 0, 0, 96]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default)]
    pub vertices: Vec<WorldCoord>,

    #[serde(default)]
    pub horizontal: Vec<Segment>,

    #[serde(default)]
    pub vertical: Vec<Segment>,

    #[serde(with = "rgba_array")]
    pub border_color: Rgba<u8>,

    #[serde(with = "rgba_array")]
    pub fill_color: Rgba<u8>,
}

impl Area {
    /// An axis-aligned rectangle with opposite corners `a` and `b`.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkmap::area::Area;
    /// use chunkmap::coord::WorldCoord;
    /// use image::Rgba;
    ///
    /// let area = Area::rectangle(
    ///     WorldCoord::new(10, -20),
    ///     WorldCoord::new(-10, 20),
    ///     Rgba([255, 0, 0, 255]),
    ///     Rgba([255, 0, 0, 64]),
    /// );
    /// assert_eq!(area.vertices.len(), 4);
    /// assert_eq!(area.horizontal.len(), 2);
    /// assert_eq!(area.vertical.len(), 2);
    /// ```
    pub fn rectangle(a: WorldCoord, b: WorldCoord, border: Rgba<u8>, fill: Rgba<u8>) -> Self {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));

        let top_left = WorldCoord::new(x0, y0);
        let top_right = WorldCoord::new(x1, y0);
        let bottom_left = WorldCoord::new(x0, y1);
        let bottom_right = WorldCoord::new(x1, y1);

        Self {
            vertices: vec![top_left, top_right, bottom_right, bottom_left],
            horizontal: vec![
                Segment::new(top_left, top_right),
                Segment::new(bottom_left, bottom_right),
            ],
            vertical: vec![
                Segment::new(top_left, bottom_left),
                Segment::new(top_right, bottom_right),
            ],
            border_color: border,
            fill_color: fill,
        }
    }

    /// Every coordinate that bounds this area: vertices and segment endpoints.
    pub fn points(&self) -> impl Iterator<Item = WorldCoord> + '_ {
        self.vertices.iter().copied().chain(
            self.horizontal
                .iter()
                .chain(self.vertical.iter())
                .flat_map(|s| [s.0, s.1]),
        )
    }

    /// Check that the area has points and that its segments are axis-aligned.
    ///
    /// `index` is the area's position in the render list, used for errors.
    pub fn validate(&self, index: usize) -> Result<(), AreaError> {
        if self.points().next().is_none() {
            return Err(AreaError::Empty { index });
        }

        if let Some(segment) = self.horizontal.iter().find(|s| s.0.y != s.1.y) {
            return Err(AreaError::SkewedSegment {
                index,
                segment: *segment,
                expected: "horizontal",
            });
        }

        if let Some(segment) = self.vertical.iter().find(|s| s.0.x != s.1.x) {
            return Err(AreaError::SkewedSegment {
                index,
                segment: *segment,
                expected: "vertical",
            });
        }

        Ok(())
    }
}

/// Serde adapter for `Rgba<u8>` as a `[r, g, b, a]` array.
mod rgba_array {
    use image::Rgba;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgba<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        color.0.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgba<u8>, D::Error> {
        <[u8; 4]>::deserialize(deserializer).map(Rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const PINK: Rgba<u8> = Rgba([255, 0, 0, 64]);

    #[test]
    fn test_rectangle_normalizes_corners() {
        let area = Area::rectangle(WorldCoord::new(5, 9), WorldCoord::new(-5, -9), RED, PINK);

        assert_eq!(area.vertices[0], WorldCoord::new(-5, -9));
        assert_eq!(area.vertices[2], WorldCoord::new(5, 9));
        assert!(area.horizontal.iter().all(|s| s.start().y == s.end().y));
        assert!(area.vertical.iter().all(|s| s.start().x == s.end().x));
        assert!(area.validate(0).is_ok());
    }

    #[test]
    fn test_points_include_segment_endpoints() {
        let area = Area {
            vertices: vec![WorldCoord::new(0, 0)],
            horizontal: vec![Segment::new(WorldCoord::new(0, 0), WorldCoord::new(4, 0))],
            vertical: vec![],
            border_color: RED,
            fill_color: PINK,
        };

        let points: Vec<_> = area.points().collect();
        assert_eq!(points.len(), 3);
        assert!(points.contains(&WorldCoord::new(4, 0)));
    }

    #[test]
    fn test_validate_empty() {
        let area = Area {
            vertices: vec![],
            horizontal: vec![],
            vertical: vec![],
            border_color: RED,
            fill_color: PINK,
        };
        assert!(matches!(area.validate(3), Err(AreaError::Empty { index: 3 })));
    }

    #[test]
    fn test_validate_skewed_horizontal() {
        let mut area = Area::rectangle(WorldCoord::new(0, 0), WorldCoord::new(4, 4), RED, PINK);
        area.horizontal[1] = Segment::new(WorldCoord::new(0, 4), WorldCoord::new(4, 5));

        assert!(matches!(
            area.validate(0),
            Err(AreaError::SkewedSegment {
                expected: "horizontal",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_skewed_vertical() {
        let mut area = Area::rectangle(WorldCoord::new(0, 0), WorldCoord::new(4, 4), RED, PINK);
        area.vertical[0] = Segment::new(WorldCoord::new(0, 0), WorldCoord::new(1, 4));

        assert!(matches!(
            area.validate(0),
            Err(AreaError::SkewedSegment {
                expected: "vertical",
                ..
            })
        ));
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let text = r#"[{
            "vertices": [{"x": 0, "y": 0}, {"x": 8, "y": 8}],
            "horizontal": [[{"x": 0, "y": 0}, {"x": 8, "y": 0}]],
            "vertical": [[{"x": 0, "y": 0}, {"x": 0, "y": 8}]],
            "borderColor": [255, 0, 0, 255],
            "fillColor": [255, 0, 0, 64]
        }]"#;

        let areas: Vec<Area> = serde_json::from_str(text).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].border_color, RED);
        assert_eq!(areas[0].fill_color, PINK);
        assert_eq!(
            areas[0].horizontal[0],
            Segment::new(WorldCoord::new(0, 0), WorldCoord::new(8, 0))
        );

        let json = serde_json::to_value(&areas[0]).unwrap();
        assert_eq!(json["borderColor"], serde_json::json!([255, 0, 0, 255]));
    }

    #[test]
    fn test_json_segments_default_to_empty() {
        let text = r#"{
            "vertices": [{"x": 1, "y": 1}],
            "borderColor": [0, 0, 0, 255],
            "fillColor": [0, 0, 0, 0]
        }"#;

        let area: Area = serde_json::from_str(text).unwrap();
        assert!(area.horizontal.is_empty());
        assert!(area.vertical.is_empty());
    }
}
