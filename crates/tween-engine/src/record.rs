//! One photo's editable develop settings plus its fixed capture facts

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::warn;
use xmp_sidecar::{sidecar_name_for, Sidecar, Value};

use crate::error::{Result, TweenError};
use crate::keys::{CameraFact, Parameter, Setting, CUSTOM_WHITE_BALANCE, WHITE_BALANCE_KEY};

/// Value applied by a static override
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct PhotoRecord {
    sidecar: Sidecar,
    capture_time: NaiveDateTime,
    shutter_speed: Option<f64>,
    aperture: Option<f64>,
}

impl PhotoRecord {
    /// Wrap a parsed sidecar. Fails if the capture timestamp is missing or
    /// unparseable; there is no fallback timestamp.
    pub fn from_sidecar(sidecar: Sidecar) -> Result<Self> {
        let capture_time = sidecar.capture_timestamp().map_err(|source| TweenError::Sidecar {
            file: describe(&sidecar),
            source,
        })?;

        let fact = |f: CameraFact| sidecar.get_number(f.category().prefix(), f.key());
        let shutter_speed = fact(CameraFact::ShutterSpeed);
        let aperture = fact(CameraFact::Aperture);

        Ok(Self {
            sidecar,
            capture_time,
            shutter_speed,
            aperture,
        })
    }

    /// Parse sidecar text held in memory
    pub fn parse(text: &str) -> Result<Self> {
        let sidecar = Sidecar::parse(text).map_err(|source| TweenError::Sidecar {
            file: "<memory>".to_string(),
            source,
        })?;
        Self::from_sidecar(sidecar)
    }

    /// Load a record from a sidecar file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let sidecar = Sidecar::load(path).map_err(|source| TweenError::Sidecar {
            file: path.display().to_string(),
            source,
        })?;
        Self::from_sidecar(sidecar)
    }

    pub fn capture_time(&self) -> NaiveDateTime {
        self.capture_time
    }

    /// Whole seconds elapsed from `earlier` to this record, truncated toward zero
    pub fn seconds_since(&self, earlier: &PhotoRecord) -> i64 {
        self.capture_time
            .signed_duration_since(earlier.capture_time)
            .num_seconds()
    }

    /// Shutter speed in seconds
    pub fn shutter_speed(&self) -> Result<f64> {
        self.require(CameraFact::ShutterSpeed, self.shutter_speed)
    }

    /// Aperture as an f-number
    pub fn aperture(&self) -> Result<f64> {
        self.require(CameraFact::Aperture, self.aperture)
    }

    fn require(&self, fact: CameraFact, value: Option<f64>) -> Result<f64> {
        match value {
            Some(v) if v > 0.0 => Ok(v),
            Some(v) => Err(TweenError::InvalidCameraFact {
                file: self.label(),
                field: fact.key(),
                value: v,
            }),
            None => Err(TweenError::MissingCameraFact {
                file: self.label(),
                field: fact.key(),
            }),
        }
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.sidecar
            .get_number(parameter.category().prefix(), parameter.key())
    }

    /// Store a tracked parameter. Temperature and tint only take effect with a
    /// custom white balance, so writing either one also sets that mode.
    pub fn set(&mut self, parameter: Parameter, value: f64) {
        if parameter.forces_custom_white_balance() {
            self.sidecar
                .set(parameter.category().prefix(), WHITE_BALANCE_KEY, CUSTOM_WHITE_BALANCE);
        }
        self.sidecar
            .set(parameter.category().prefix(), parameter.key(), value);
    }

    /// Apply a static override
    pub fn apply(&mut self, setting: Setting, value: &SettingValue) {
        match (setting, value) {
            (Setting::Tracked(p), SettingValue::Number(n)) => self.set(p, *n),
            (_, SettingValue::Number(n)) => {
                self.sidecar.set(setting.category().prefix(), setting.key(), *n)
            }
            (_, SettingValue::Text(s)) => {
                self.sidecar
                    .set(setting.category().prefix(), setting.key(), Value::Text(s.clone()))
            }
        }
    }

    pub fn text(&self, setting: Setting) -> Option<&str> {
        self.sidecar.get_str(setting.category().prefix(), setting.key())
    }

    /// True if the photographer (or an earlier run) edited this photo.
    ///
    /// Any tracked parameter counts, even in a sidecar without `RawFileName`.
    pub fn has_edits(&self) -> bool {
        self.sidecar.has_edits() || Parameter::ALL.into_iter().any(|p| self.get(p).is_some())
    }

    pub fn sidecar(&self) -> &Sidecar {
        &self.sidecar
    }

    /// File name for the written sidecar, derived from the raw file name.
    /// Falls back to the name of the file the record was loaded from.
    pub fn output_file_name(&self) -> Result<String> {
        if let Ok(name) = self.sidecar.output_file_name() {
            return Ok(name);
        }

        let source_name = self
            .sidecar
            .source()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());

        match source_name {
            Some(name) => {
                warn!(file = name, "no RawFileName, reusing the source file name");
                Ok(sidecar_name_for(name))
            }
            None => self.sidecar.output_file_name().map_err(|source| TweenError::Sidecar {
                file: self.label(),
                source,
            }),
        }
    }

    /// Write the sidecar into `folder`, returning the path written
    pub fn write_to(&self, folder: &Path) -> Result<PathBuf> {
        let path = folder.join(self.output_file_name()?);
        self.sidecar.write(&path).map_err(|source| TweenError::Sidecar {
            file: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }

    /// Short human-readable name for log and error messages
    pub fn label(&self) -> String {
        describe(&self.sidecar)
    }
}

fn describe(sidecar: &Sidecar) -> String {
    if let Some(path) = sidecar.source() {
        return path.display().to_string();
    }
    sidecar
        .raw_file_name()
        .map(str::to_string)
        .unwrap_or_else(|| "<memory>".to_string())
}
