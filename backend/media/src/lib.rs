//! Upload handling primitives: per-request transient image files and MIME
//! detection for the images handed to the face analyzer.

pub mod mime_detect;
pub mod transient;

pub use mime_detect::{detect_mime_type, is_image, sniff_image_mime};
pub use transient::TransientImage;
