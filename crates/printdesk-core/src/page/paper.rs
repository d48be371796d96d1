//! Paper presets in export pixels at 300 dpi.

use serde::{Deserialize, Serialize};

/// A physical paper size, expressed as export pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    /// ISO A4, 210 x 297 mm.
    #[default]
    A4,
    /// ISO A5, 148 x 210 mm.
    A5,
    /// US Letter, 8.5 x 11 in.
    Letter,
    /// Any other size in export pixels.
    Custom { width: u32, height: u32 },
}

impl PaperSize {
    /// Export dimensions in pixels (portrait).
    pub fn export_dimensions(self) -> (u32, u32) {
        match self {
            PaperSize::A4 => (2480, 3508),
            PaperSize::A5 => (1748, 2480),
            PaperSize::Letter => (2550, 3300),
            PaperSize::Custom { width, height } => (width, height),
        }
    }

    /// Preview height for a given preview width, preserving the paper ratio.
    pub fn preview_height(self, preview_width: f64) -> f64 {
        let (w, h) = self.export_dimensions();
        (h as f64 / w as f64 * preview_width).round()
    }

    /// Scale factor from preview space to export pixels.
    pub fn export_scale(self, preview_width: f64) -> f64 {
        let (w, _) = self.export_dimensions();
        w as f64 / preview_width
    }
}
