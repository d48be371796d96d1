//! PrintDesk Core - page composition engine
//!
//! This crate provides the core functionality for PrintDesk: placing images
//! on a fixed-size printable page, rotating, removing and replacing them,
//! cropping through a start/apply/cancel protocol, and rasterizing the page
//! for preview, export and print.

pub mod config;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod error;
pub mod external;
pub mod library;
pub mod page;
pub mod render;
pub mod session;
pub mod transform;

pub use config::{EditorConfig, Theme};
pub use crop::{CropSession, Cropper};
pub use decode::{decode_image, Bitmap, DecodeError};
pub use encode::{encode, encode_jpeg, encode_png, EncodeError, ExportFormat};
pub use error::{EditorError, Result};
pub use external::{DirectoryExporter, ExportSurface, ExternalError, PdfRasterizer};
pub use page::{AddOptions, ObjectId, ObjectSummary, Page, PaperSize, PlacedObject, Point};
pub use render::{render, render_export, render_preview, RenderError};
pub use session::{EditorSession, LoadTicket};
pub use transform::{CropError, CropRect, InvalidCropRegion};
