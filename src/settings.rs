//! Ride settings and operating presets
//!
//! Loaded from JSON once at startup. Anything missing from the file falls
//! back to the Standard preset values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Operating intensity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IntensityPreset {
    Gentle,
    #[default]
    Standard,
    Thrilling,
}

impl IntensityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityPreset::Gentle => "Gentle",
            IntensityPreset::Standard => "Standard",
            IntensityPreset::Thrilling => "Thrilling",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gentle" => Some(IntensityPreset::Gentle),
            "standard" | "std" => Some(IntensityPreset::Standard),
            "thrilling" | "thrill" => Some(IntensityPreset::Thrilling),
            _ => None,
        }
    }

    /// Peak arm speed (degrees per tick)
    pub fn tower_speed_max(&self) -> f32 {
        match self {
            IntensityPreset::Gentle => 2.0,
            IntensityPreset::Standard => 3.0,
            IntensityPreset::Thrilling => 4.0,
        }
    }

    /// Peak car spin speed (degrees per tick)
    pub fn vehicle_speed_max(&self) -> f32 {
        match self {
            IntensityPreset::Gentle => 6.0,
            IntensityPreset::Standard => 9.0,
            IntensityPreset::Thrilling => 12.0,
        }
    }

    /// Peak climb speed (height units per tick)
    pub fn rise_speed_max(&self) -> f32 {
        match self {
            IntensityPreset::Gentle => 0.5,
            IntensityPreset::Standard => 1.0,
            IntensityPreset::Thrilling => 1.0,
        }
    }

    /// Dwell at the top in ticks
    pub fn spinning_top_time(&self) -> u32 {
        match self {
            IntensityPreset::Gentle => 90,
            IntensityPreset::Standard => SPINNING_TOP_TIME,
            IntensityPreset::Thrilling => 180,
        }
    }
}

/// Condor ride settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CondorSettings {
    /// Operating intensity
    pub preset: IntensityPreset,

    // === Sprites ===
    /// Arm sprites per quarter turn
    pub arm_sprite_count: u32,
    /// Spin sprites per car
    pub car_sprite_count: u32,
    /// Fraction of a turn covered by one set of arm sprites
    pub symmetry_factor: f32,

    // === Speeds ===
    pub tower_speed_min: f32,
    pub tower_speed_max: f32,
    pub vehicle_speed_min: f32,
    pub vehicle_speed_max: f32,
    pub rise_speed_min: f32,
    pub rise_speed_max: f32,

    // === Geometry & timing ===
    /// Distance from the tower centre to each car (world units)
    pub arm_radius: f32,
    /// Dwell at the top in ticks
    pub spinning_top_time: u32,
}

impl Default for CondorSettings {
    fn default() -> Self {
        Self {
            preset: IntensityPreset::Standard,

            arm_sprite_count: ARM_SPRITE_COUNT,
            car_sprite_count: CAR_SPRITE_COUNT,
            symmetry_factor: 0.25,

            tower_speed_min: 0.5,
            tower_speed_max: 3.0,
            vehicle_speed_min: 2.0,
            vehicle_speed_max: 9.0,
            rise_speed_min: 0.25,
            rise_speed_max: 1.0,

            arm_radius: ARM_RADIUS,
            spinning_top_time: SPINNING_TOP_TIME,
        }
    }
}

impl CondorSettings {
    /// Create settings from a preset (applies preset defaults)
    pub fn from_preset(preset: IntensityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a preset (updates preset-dependent settings)
    pub fn apply_preset(&mut self, preset: IntensityPreset) {
        self.preset = preset;
        self.tower_speed_max = preset.tower_speed_max();
        self.vehicle_speed_max = preset.vehicle_speed_max();
        self.rise_speed_max = preset.rise_speed_max();
        self.spinning_top_time = preset.spinning_top_time();
    }

    /// Parse and validate settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {} ({})", path.display(), settings.preset.as_str());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Using default settings: {e}");
            Self::default()
        })
    }

    /// Reject values the timing model cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let counts = [
            ("arm_sprite_count", self.arm_sprite_count),
            ("car_sprite_count", self.car_sprite_count),
        ];
        for (field, count) in counts {
            if count == 0 {
                return Err(invalid(field, "must be at least 1"));
            }
            if count > MAX_SPRITE_COUNT {
                return Err(invalid(field, "must not exceed 256"));
            }
        }
        if !positive(self.symmetry_factor) {
            return Err(invalid("symmetry_factor", "must be a positive number"));
        }
        let speeds = [
            ("tower_speed_min", "tower_speed_max", self.tower_speed_min, self.tower_speed_max),
            ("vehicle_speed_min", "vehicle_speed_max", self.vehicle_speed_min, self.vehicle_speed_max),
            ("rise_speed_min", "rise_speed_max", self.rise_speed_min, self.rise_speed_max),
        ];
        for (min_field, max_field, min, max) in speeds {
            if !positive(min) {
                return Err(invalid(min_field, "must be a positive number"));
            }
            if !positive(max) {
                return Err(invalid(max_field, "must be a positive number"));
            }
            if min > max {
                return Err(invalid(min_field, "must not exceed the maximum speed"));
            }
        }
        if !self.arm_radius.is_finite() || self.arm_radius < 0.0 {
            return Err(invalid("arm_radius", "must be a finite, non-negative number"));
        }
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CondorSettings::default().validate().is_ok());
        for preset in [
            IntensityPreset::Gentle,
            IntensityPreset::Standard,
            IntensityPreset::Thrilling,
        ] {
            assert!(CondorSettings::from_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = CondorSettings::from_json_str(r#"{ "spinning_top_time": 60 }"#).unwrap();
        assert_eq!(settings.spinning_top_time, 60);
        assert_eq!(settings.arm_sprite_count, ARM_SPRITE_COUNT);
    }

    #[test]
    fn test_rejects_zero_speed() {
        let err = CondorSettings::from_json_str(r#"{ "rise_speed_min": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "rise_speed_min",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_speeds() {
        let settings = CondorSettings {
            tower_speed_min: 5.0,
            tower_speed_max: 1.0,
            ..CondorSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "tower_speed_min",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_sprites() {
        let err = CondorSettings::from_json_str(r#"{ "car_sprite_count": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("car_sprite_count"));
    }

    #[test]
    fn test_rejects_oversized_sprite_counts() {
        for field in ["arm_sprite_count", "car_sprite_count"] {
            let json = format!(r#"{{ "{field}": 2000000000 }}"#);
            let err = CondorSettings::from_json_str(&json).unwrap_err();
            assert!(matches!(err, SettingsError::Invalid { field: f, .. } if f == field));
        }

        let json = format!(
            r#"{{ "arm_sprite_count": {MAX_SPRITE_COUNT}, "car_sprite_count": {MAX_SPRITE_COUNT} }}"#
        );
        let settings = CondorSettings::from_json_str(&json).unwrap();
        let config = crate::ride::CondorConfig::new(settings);
        assert_eq!(config.locations.period(), MAX_SPRITE_COUNT * ARMS as u32);
        assert_eq!(config.rig().home_quads(0)[3], 3 * MAX_SPRITE_COUNT);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = CondorSettings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = CondorSettings::load_or_default(Path::new("/nonexistent/condor.json"));
        assert_eq!(settings, CondorSettings::default());
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(IntensityPreset::parse("THRILL"), Some(IntensityPreset::Thrilling));
        assert_eq!(IntensityPreset::parse("gentle"), Some(IntensityPreset::Gentle));
        assert_eq!(IntensityPreset::parse("wild"), None);
        let settings = CondorSettings::from_preset(IntensityPreset::Gentle);
        assert_eq!(settings.spinning_top_time, 90);
        assert_eq!(settings.preset.as_str(), "Gentle");
    }
}
