//! Keyframe interpolation and exposure smoothing for xmp-tween
//!
//! This crate turns a folder of Lightroom sidecars into a capture-ordered
//! sequence, blends develop settings between the hand-edited frames and
//! evens out the exposure jumps caused by the camera's automatic mode.

pub mod batch;
pub mod error;
pub mod exposure;
pub mod interpolate;
pub mod keyframes;
pub mod keys;
pub mod match_table;
pub mod record;
pub mod sequence;

pub use batch::{parse_overrides, BatchConfig, BatchReport, BatchRunner, Override, Stage};
pub use error::{Result, TweenError};
pub use exposure::{correction, ExposureCompensator};
pub use interpolate::tween;
pub use keyframes::Tweenpoints;
pub use keys::{CameraFact, Category, Parameter, Setting};
pub use match_table::{ExposureMatchTable, MatchCell, MatchRow};
pub use record::{PhotoRecord, SettingValue};
pub use sequence::load_folder;
