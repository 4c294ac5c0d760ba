//! Bitmap export with a guaranteed fallback to SVG.

use crate::calendar::{pipeline::CalendarSnapshot, svg_export::render_svg};

/// The error returned by a [Rasterizer].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("rasterization failed: {0}")]
pub struct RasterError(pub String);

/// Turns an SVG document into a PNG image.
///
/// Rasterizers are external, the crate does not ship one.
pub trait Rasterizer {
    /// # Errors
    /// Returns a [RasterError] if the image could not be produced.
    fn rasterize(&self, svg: &str) -> Result<Vec<u8>, RasterError>;
}

/// The image produced by [export_image].
#[derive(Debug, Clone, PartialEq)]
pub enum ImageExport {
    /// PNG bytes from the rasterizer.
    Bitmap(Vec<u8>),
    /// The SVG document, used when there is no rasterizer or it failed.
    Vector(String),
}

/// Export the calendar as an image.
///
/// The SVG is always rendered first. A rasterizer failure is logged and the
/// SVG is returned instead, so this never fails.
pub fn export_image(
    snapshot: &CalendarSnapshot,
    available_width: u32,
    rasterizer: Option<&dyn Rasterizer>,
) -> ImageExport {
    let svg = render_svg(snapshot, available_width);

    let Some(rasterizer) = rasterizer else {
        return ImageExport::Vector(svg);
    };

    match rasterizer.rasterize(&svg) {
        Ok(bytes) => ImageExport::Bitmap(bytes),
        Err(error) => {
            tracing::warn!("{error}, falling back to SVG export");
            ImageExport::Vector(svg)
        }
    }
}
