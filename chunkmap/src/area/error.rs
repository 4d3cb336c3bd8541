//! Error types for area rendering.

use thiserror::Error;

use super::Segment;
use crate::coord::CoordError;

/// Errors that can occur while rendering areas.
///
/// Any error aborts the whole render call; no output is produced.
#[derive(Debug, Error)]
pub enum AreaError {
    /// The area has no vertices or segments.
    #[error("area {index} has no points")]
    Empty { index: usize },

    /// A segment is not parallel to the axis its list implies.
    #[error("area {index}: {expected} segment {segment:?} is not axis-aligned")]
    SkewedSegment {
        index: usize,
        segment: Segment,
        expected: &'static str,
    },

    /// A point of the area maps outside the raster.
    #[error("area {index}: {source}")]
    OutOfBounds {
        index: usize,
        #[source]
        source: CoordError,
    },

    /// The base raster doesn't match the metadata it's rendered with.
    #[error("base raster is {actual:?}, metadata expects {expected:?}")]
    RasterMismatch {
        actual: (u32, u32),
        expected: (u32, u32),
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_display_includes_index() {
        let err = AreaError::OutOfBounds {
            index: 2,
            source: CoordError::OutOfBounds {
                x: -1.0,
                y: 4.0,
                width: 10,
                height: 10,
            },
        };
        assert_eq!(err.to_string(), "area 2: x=-1, y=4 is out of the map (10*10)");
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(AreaError::Empty { index: 0 }.to_string(), "area 0 has no points");
    }
}
