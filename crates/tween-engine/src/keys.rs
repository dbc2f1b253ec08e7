//! The closed set of sidecar keys xmp-tween reads and writes
//!
//! Every key carries its XMP namespace at compile time, so a record never has
//! to look a category up at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use xmp_sidecar::{CRS, EXIF};

use crate::error::TweenError;

/// Key of the white balance mode, forced to [`CUSTOM_WHITE_BALANCE`] whenever
/// temperature or tint is written
pub const WHITE_BALANCE_KEY: &str = "WhiteBalance";
pub const CUSTOM_WHITE_BALANCE: &str = "Custom";

const CAMERA_PROFILE_KEY: &str = "CameraProfile";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Crs,
    Exif,
}

impl Category {
    pub const fn prefix(self) -> &'static str {
        match self {
            Category::Crs => CRS,
            Category::Exif => EXIF,
        }
    }
}

/// A tracked develop setting: interpolated between tweenpoints and
/// overridable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Exposure,
    Contrast,
    Highlights,
    Shadows,
    Whites,
    Blacks,
    Clarity,
    Vibrance,
    Saturation,
    Temperature,
    Tint,
}

impl Parameter {
    pub const ALL: [Parameter; 11] = [
        Parameter::Exposure,
        Parameter::Contrast,
        Parameter::Highlights,
        Parameter::Shadows,
        Parameter::Whites,
        Parameter::Blacks,
        Parameter::Clarity,
        Parameter::Vibrance,
        Parameter::Saturation,
        Parameter::Temperature,
        Parameter::Tint,
    ];

    /// Attribute name inside the sidecar (Process Version 2012 names)
    pub const fn key(self) -> &'static str {
        match self {
            Parameter::Exposure => "Exposure2012",
            Parameter::Contrast => "Contrast2012",
            Parameter::Highlights => "Highlights2012",
            Parameter::Shadows => "Shadows2012",
            Parameter::Whites => "Whites2012",
            Parameter::Blacks => "Blacks2012",
            Parameter::Clarity => "Clarity2012",
            Parameter::Vibrance => "Vibrance",
            Parameter::Saturation => "Saturation",
            Parameter::Temperature => "Temperature",
            Parameter::Tint => "Tint",
        }
    }

    pub const fn category(self) -> Category {
        Category::Crs
    }

    /// Short lowercase name used on the command line and in config files
    pub const fn name(self) -> &'static str {
        match self {
            Parameter::Exposure => "exposure",
            Parameter::Contrast => "contrast",
            Parameter::Highlights => "highlights",
            Parameter::Shadows => "shadows",
            Parameter::Whites => "whites",
            Parameter::Blacks => "blacks",
            Parameter::Clarity => "clarity",
            Parameter::Vibrance => "vibrance",
            Parameter::Saturation => "saturation",
            Parameter::Temperature => "temperature",
            Parameter::Tint => "tint",
        }
    }

    /// Writing this parameter switches white balance to custom
    pub const fn forces_custom_white_balance(self) -> bool {
        matches!(self, Parameter::Temperature | Parameter::Tint)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = TweenError;

    /// Accepts the short name (`exposure`) or the sidecar key (`Exposure2012`),
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s) || p.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| TweenError::UnknownSetting(s.to_string()))
    }
}

/// Capture facts recorded by the camera; never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFact {
    ShutterSpeed,
    Aperture,
}

impl CameraFact {
    pub const fn key(self) -> &'static str {
        match self {
            CameraFact::ShutterSpeed => "ExposureTime",
            CameraFact::Aperture => "FNumber",
        }
    }

    pub const fn category(self) -> Category {
        Category::Exif
    }
}

/// Anything a static override may target: a tracked parameter or one of the
/// text-valued settings Lightroom keeps alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Setting {
    Tracked(Parameter),
    WhiteBalance,
    CameraProfile,
}

impl Setting {
    pub const fn key(self) -> &'static str {
        match self {
            Setting::Tracked(p) => p.key(),
            Setting::WhiteBalance => WHITE_BALANCE_KEY,
            Setting::CameraProfile => CAMERA_PROFILE_KEY,
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Setting::Tracked(p) => p.category(),
            Setting::WhiteBalance | Setting::CameraProfile => Category::Crs,
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, Setting::Tracked(_))
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Tracked(p) => f.write_str(p.name()),
            Setting::WhiteBalance => f.write_str("whitebalance"),
            Setting::CameraProfile => f.write_str("cameraprofile"),
        }
    }
}

impl FromStr for Setting {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(p) = s.parse::<Parameter>() {
            return Ok(Setting::Tracked(p));
        }

        let folded: String = s.chars().filter(|c| *c != '_' && *c != '-').collect();
        if folded.eq_ignore_ascii_case(WHITE_BALANCE_KEY) {
            Ok(Setting::WhiteBalance)
        } else if folded.eq_ignore_ascii_case(CAMERA_PROFILE_KEY) {
            Ok(Setting::CameraProfile)
        } else {
            Err(TweenError::UnknownSetting(s.to_string()))
        }
    }
}

impl TryFrom<String> for Setting {
    type Error = TweenError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Setting> for String {
    fn from(setting: Setting) -> Self {
        setting.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_from_str() {
        assert_eq!("exposure".parse::<Parameter>().unwrap(), Parameter::Exposure);
        assert_eq!("Exposure2012".parse::<Parameter>().unwrap(), Parameter::Exposure);
        assert_eq!("HIGHLIGHTS".parse::<Parameter>().unwrap(), Parameter::Highlights);
        assert_eq!("tint".parse::<Parameter>().unwrap(), Parameter::Tint);
        assert!(matches!(
            "sharpness".parse::<Parameter>(),
            Err(TweenError::UnknownSetting(_))
        ));
    }

    #[test]
    fn test_every_parameter_is_a_develop_setting() {
        for p in Parameter::ALL {
            assert_eq!(p.category(), Category::Crs);
            assert_eq!(p.category().prefix(), "crs");
            assert_eq!(p.name().parse::<Parameter>().unwrap(), p);
        }
        assert_eq!(CameraFact::ShutterSpeed.category().prefix(), "exif");
    }

    #[test]
    fn test_white_balance_coupling() {
        let forcing: Vec<Parameter> = Parameter::ALL
            .into_iter()
            .filter(|p| p.forces_custom_white_balance())
            .collect();
        assert_eq!(forcing, vec![Parameter::Temperature, Parameter::Tint]);
    }

    #[test]
    fn test_setting_from_str() {
        assert_eq!("contrast".parse::<Setting>().unwrap(), Setting::Tracked(Parameter::Contrast));
        assert_eq!("WhiteBalance".parse::<Setting>().unwrap(), Setting::WhiteBalance);
        assert_eq!("white_balance".parse::<Setting>().unwrap(), Setting::WhiteBalance);
        assert_eq!("camera-profile".parse::<Setting>().unwrap(), Setting::CameraProfile);
        assert!("lens".parse::<Setting>().is_err());
    }

    #[test]
    fn test_setting_serde_uses_names() {
        let json = serde_json::to_string(&Setting::Tracked(Parameter::Shadows)).unwrap();
        assert_eq!(json, "\"shadows\"");
        let back: Setting = serde_json::from_str("\"CameraProfile\"").unwrap();
        assert_eq!(back, Setting::CameraProfile);
        assert!(serde_json::from_str::<Setting>("\"bogus\"").is_err());
    }
}
