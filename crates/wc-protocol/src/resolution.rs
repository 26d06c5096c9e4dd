//! Camera resolution presets offered when creating a project

use std::fmt;

/// Number of camera heights captured per bed rotation.
const CAPTURES_PER_STEP: u32 = 3;

/// Resolution preset of the scanner camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PictureResolution {
    /// 640x480
    Low,
    /// 1640x1232
    Medium,
    /// 3280x2464
    High,
}

impl PictureResolution {
    /// Parse the numeric preset code used by the creation form (1, 2 or 3)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// Parse whatever the scanner reports: a preset code or a label.
    pub fn from_wire(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(code) = value.parse::<u8>() {
            return Self::from_code(code);
        }
        [Self::Low, Self::Medium, Self::High]
            .into_iter()
            .find(|res| res.label() == value)
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Label shown to users and stored by the scanner
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "640x480",
            Self::Medium => "1640x1232",
            Self::High => "3280x2464",
        }
    }

    /// Approximate size of a single picture in kilobytes
    pub fn picture_size_kb(&self) -> u32 {
        match self {
            Self::Low => 62,
            Self::Medium => 413,
            Self::High => 1650,
        }
    }

    /// Estimated size in megabytes of one complete bed rotation.
    pub fn estimated_rotation_mb(&self, pict_per_rotation: u32) -> f64 {
        f64::from(self.picture_size_kb())
            * f64::from(CAPTURES_PER_STEP)
            * f64::from(pict_per_rotation)
            / 1000.0
    }
}

impl fmt::Display for PictureResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
