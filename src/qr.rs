//! QR rendering for bridge login codes.

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Minimum edge length of the rendered image, in pixels.
const QR_SIZE: u32 = 512;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("empty login code")]
    Empty,

    #[error("QR generation failed: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// Render `code` as an SVG document with high error correction.
pub fn render_svg(code: &str) -> Result<String, QrError> {
    if code.is_empty() {
        return Err(QrError::Empty);
    }

    let svg = QrCode::with_error_correction_level(code.as_bytes(), EcLevel::H)?
        .render::<svg::Color<'_>>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#FFFFFF"))
        .build();
    Ok(svg)
}

/// Blob name for a QR image rendered at `millis` since the epoch.
pub fn blob_name(millis: i64) -> String {
    format!("qr-{millis}.svg")
}
