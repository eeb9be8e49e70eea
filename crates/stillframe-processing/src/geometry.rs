//! Target thumbnail geometry.

use crate::toolkit::VideoStreamInfo;

/// Base width of every thumbnail, in pixels.
const BASE_WIDTH: u32 = 360;
/// Target height/width ratio: 9:16 portrait.
const TARGET_RATIO: f64 = 16.0 / 9.0;
/// How far the source ratio may drift from the target before the height is
/// recomputed from the source's actual ratio.
const RATIO_TOLERANCE: f64 = 0.1;

/// Pixel dimensions of the thumbnail to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    /// Derive the thumbnail size from the source geometry.
    ///
    /// Starts from the 9:16 portrait target at a 360px base width
    /// (360x640). Sources whose height/width ratio is within the tolerance
    /// keep that target; anything else keeps the base width and takes its
    /// height from the source's actual ratio, rounded to nearest.
    pub fn for_source(info: &VideoStreamInfo) -> Self {
        let source_ratio = info.height as f64 / info.width as f64;
        let height = if (source_ratio - TARGET_RATIO).abs() > RATIO_TOLERANCE {
            (BASE_WIDTH as f64 * source_ratio).round() as u32
        } else {
            (BASE_WIDTH as f64 * TARGET_RATIO).round() as u32
        };
        Self {
            width: BASE_WIDTH,
            height,
        }
    }
}

impl std::fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
