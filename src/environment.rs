use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::material::hex_color;

/// Named environment backdrop presets
///
/// A preset stands in for an externally authored reflection/lighting
/// environment. The shading model only consumes the hemispheric ambient
/// colors and a reflection strength, so that is all a preset resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentPreset {
    City,
    Studio,
    Sunset,
    Dawn,
    Night,
}

/// Hemispheric ambient contribution resolved from a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentLighting {
    /// Ambient color arriving from above the horizon
    pub sky: [f32; 3],
    /// Ambient color arriving from below the horizon
    pub ground: [f32; 3],
    /// How strongly metallic surfaces tint toward the sky color
    pub reflection: f32,
}

impl EnvironmentPreset {
    pub const ALL: [EnvironmentPreset; 5] = [
        EnvironmentPreset::City,
        EnvironmentPreset::Studio,
        EnvironmentPreset::Sunset,
        EnvironmentPreset::Dawn,
        EnvironmentPreset::Night,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EnvironmentPreset::City => "city",
            EnvironmentPreset::Studio => "studio",
            EnvironmentPreset::Sunset => "sunset",
            EnvironmentPreset::Dawn => "dawn",
            EnvironmentPreset::Night => "night",
        }
    }

    pub fn lighting(&self) -> EnvironmentLighting {
        match self {
            EnvironmentPreset::City => EnvironmentLighting {
                sky: hex_color(0x9FB4C7),
                ground: hex_color(0x3A3F47),
                reflection: 0.85,
            },
            EnvironmentPreset::Studio => EnvironmentLighting {
                sky: hex_color(0xE8E8E8),
                ground: hex_color(0x808080),
                reflection: 1.0,
            },
            EnvironmentPreset::Sunset => EnvironmentLighting {
                sky: hex_color(0xF2A65A),
                ground: hex_color(0x4A2E3D),
                reflection: 0.7,
            },
            EnvironmentPreset::Dawn => EnvironmentLighting {
                sky: hex_color(0xC9BFE0),
                ground: hex_color(0x544A5E),
                reflection: 0.6,
            },
            EnvironmentPreset::Night => EnvironmentLighting {
                sky: hex_color(0x20273D),
                ground: hex_color(0x0B0E16),
                reflection: 0.4,
            },
        }
    }
}

impl fmt::Display for EnvironmentPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnvironmentPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvironmentPreset::ALL
            .iter()
            .copied()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown environment preset '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve_by_name() {
        for preset in EnvironmentPreset::ALL {
            assert_eq!(preset.name().parse::<EnvironmentPreset>(), Ok(preset));
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("City".parse(), Ok(EnvironmentPreset::City));
        assert_eq!("NIGHT".parse(), Ok(EnvironmentPreset::Night));
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!("warehouse".parse::<EnvironmentPreset>().is_err());
    }

    #[test]
    fn reflection_strength_is_normalized() {
        for preset in EnvironmentPreset::ALL {
            let lighting = preset.lighting();
            assert!((0.0..=1.0).contains(&lighting.reflection));
        }
    }
}
