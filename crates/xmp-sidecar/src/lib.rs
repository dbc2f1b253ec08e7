//! XMP sidecar reader and writer for xmp-tween
//!
//! Parses the `category:Key="value"` attributes Lightroom stores on the
//! `<rdf:Description>` element of a sidecar file, exposes them as typed
//! values, and writes the file back with every untouched byte preserved.

pub mod error;
pub mod sidecar;
pub mod timestamp;
pub mod value;

pub use error::{Result, SidecarError};
pub use sidecar::{sidecar_name_for, Sidecar};
pub use timestamp::parse_capture_time;
pub use value::Value;

/// Camera Raw develop settings namespace prefix
pub const CRS: &str = "crs";

/// EXIF namespace prefix
pub const EXIF: &str = "exif";

/// Extension of sidecar files, without the dot
pub const SIDECAR_EXTENSION: &str = "xmp";
