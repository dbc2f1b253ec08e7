//! Batch orchestration: load, tween, smooth, override, write
//!
//! The runner owns the record sequence for the duration of a batch and hands
//! it to each stage in turn. Every stage except loading and writing is
//! optional and controlled by [`BatchConfig`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TweenError};
use crate::exposure::ExposureCompensator;
use crate::interpolate::tween;
use crate::keyframes::Tweenpoints;
use crate::keys::Setting;
use crate::record::{PhotoRecord, SettingValue};
use crate::sequence::load_folder;

/// A value applied uniformly to every record after all other stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    pub setting: Setting,
    pub value: SettingValue,
}

impl Override {
    /// Parse one `SETTING VALUE` pair from the command line.
    pub fn parse(setting: &str, value: &str) -> Result<Self> {
        let setting: Setting = setting.parse()?;
        let value = if setting.is_numeric() {
            let n: f64 = value
                .trim_start_matches('+')
                .parse()
                .ok()
                .filter(|n: &f64| n.is_finite())
                .ok_or_else(|| TweenError::InvalidOverrideValue {
                    setting: setting.to_string(),
                    value: value.to_string(),
                })?;
            SettingValue::Number(n)
        } else {
            check_text(setting, value)?;
            SettingValue::Text(value.to_string())
        };

        Ok(Self { setting, value })
    }
}

/// Text values are written verbatim inside a double-quoted attribute, so they
/// may not contain quotes, markup characters or control characters.
fn check_text(setting: Setting, value: &str) -> Result<()> {
    if value.contains(|c: char| matches!(c, '"' | '<' | '&') || c.is_control()) {
        return Err(TweenError::InvalidOverrideValue {
            setting: setting.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Turn a flat `SETTING VALUE SETTING VALUE ...` list into overrides.
pub fn parse_overrides<S: AsRef<str>>(args: &[S]) -> Result<Vec<Override>> {
    if args.len() % 2 != 0 {
        return Err(TweenError::OddOverrideList(args.len()));
    }

    args.chunks_exact(2)
        .map(|pair| Override::parse(pair[0].as_ref(), pair[1].as_ref()))
        .collect()
}

/// Which stages a batch runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Interpolate tracked parameters between tweenpoints
    pub tween: bool,
    /// Seconds on either side of a frame to average when smoothing exposure;
    /// `None` disables exposure smoothing
    pub exposure_smoothing: Option<f64>,
    pub overrides: Vec<Override>,
}

impl BatchConfig {
    /// Load a config from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TweenError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| TweenError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(window) = self.exposure_smoothing {
            ExposureCompensator::new(window)?;
        }
        for o in &self.overrides {
            if o.setting.is_numeric() != matches!(o.value, SettingValue::Number(_)) {
                return Err(TweenError::InvalidOverrideValue {
                    setting: o.setting.to_string(),
                    value: match &o.value {
                        SettingValue::Number(n) => n.to_string(),
                        SettingValue::Text(s) => s.clone(),
                    },
                });
            }
            if let SettingValue::Text(text) = &o.value {
                check_text(o.setting, text)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CompensateTweenpoints,
    Tween,
    SmoothExposures,
    ApplyOverrides,
}

/// Summary of a finished batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub record_count: usize,
    pub tweenpoints: Tweenpoints,
    pub stages: Vec<Stage>,
    pub tweened: usize,
    pub written: Vec<PathBuf>,
}

pub struct BatchRunner {
    config: BatchConfig,
    compensator: Option<ExposureCompensator>,
}

impl BatchRunner {
    /// Validate the config up front so a bad batch fails before touching files.
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let compensator = config
            .exposure_smoothing
            .map(ExposureCompensator::new)
            .transpose()?;

        Ok(Self { config, compensator })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run every configured in-memory stage over a capture-ordered sequence.
    pub fn process(&self, records: &mut [PhotoRecord]) -> Result<BatchReport> {
        let tweenpoints = Tweenpoints::select(records);
        info!(records = records.len(), tweenpoints = tweenpoints.len(), "selected tweenpoints");

        let mut report = BatchReport {
            record_count: records.len(),
            ..Default::default()
        };

        if let Some(compensator) = &self.compensator {
            compensator.compensate_tweenpoints(&tweenpoints, records)?;
            report.stages.push(Stage::CompensateTweenpoints);
        }

        if self.config.tween {
            report.tweened = tween(&tweenpoints, records);
            info!(tweened = report.tweened, "interpolated records");
            report.stages.push(Stage::Tween);
        }

        if let Some(compensator) = &self.compensator {
            compensator.smooth_exposures(records)?;
            report.stages.push(Stage::SmoothExposures);
        }

        if !self.config.overrides.is_empty() {
            for record in records.iter_mut() {
                for o in &self.config.overrides {
                    record.apply(o.setting, &o.value);
                }
            }
            info!(overrides = self.config.overrides.len(), "applied static overrides");
            report.stages.push(Stage::ApplyOverrides);
        }

        report.tweenpoints = tweenpoints;
        Ok(report)
    }

    /// Process every sidecar in `source` and write the results to
    /// `destination` (or back into `source`).
    pub fn run_folder(&self, source: &Path, destination: Option<&Path>) -> Result<BatchReport> {
        let mut records = load_folder(source)?;

        let out_dir = destination.unwrap_or(source);
        ensure_destination(out_dir)?;

        let mut report = self.process(&mut records)?;
        report.written = write_records(&records, out_dir)?;
        info!(written = report.written.len(), dest = %out_dir.display(), "batch complete");
        Ok(report)
    }
}

/// Create the destination folder. An existing directory is fine; anything
/// else that stops creation is an error.
pub fn ensure_destination(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            if dir.is_dir() {
                Ok(())
            } else {
                Err(TweenError::NotADirectory(dir.to_path_buf()))
            }
        }
        Err(e) => Err(TweenError::io(dir, e)),
    }
}

/// Write every record into `dir`, one file per record.
pub fn write_records(records: &[PhotoRecord], dir: &Path) -> Result<Vec<PathBuf>> {
    records.iter().map(|r| r.write_to(dir)).collect()
}
