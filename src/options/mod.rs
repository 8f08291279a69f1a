use serde::{Deserialize, Serialize};

pub const AUTO_VERSION: u32 = 0;
pub const MAX_VERSION: u32 = 40;

const DEFAULT_MODULE_SIZE: u32 = 10;
const DEFAULT_BORDER: u32 = 4;

/// Error-correction tier. Redundancy grows from `L` (~7%) to `H` (~30%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl EcLevel {
    /// Case-insensitive parse of the persisted/user-facing letter.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "L" => Some(Self::L),
            "M" => Some(Self::M),
            "Q" => Some(Self::Q),
            "H" => Some(Self::H),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }

    pub const ALL: [Self; 4] = [Self::L, Self::M, Self::Q, Self::H];
}

impl std::fmt::Display for EcLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated encoding configuration. `version == 0` means auto-fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionsRecord {
    pub version: u32,
    pub error_correction: EcLevel,
    pub module_size: u32,
    pub border: u32,
}

impl Default for OptionsRecord {
    fn default() -> Self {
        Self {
            version: AUTO_VERSION,
            error_correction: EcLevel::M,
            module_size: DEFAULT_MODULE_SIZE,
            border: DEFAULT_BORDER,
        }
    }
}

/// The unvalidated wire/dialog form of [`OptionsRecord`]. Fields are
/// optional and deliberately wide; `normalize` is the only way back into
/// the valid space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawOptions {
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub error_correction: Option<String>,
    #[serde(default)]
    pub module_size: Option<i64>,
    #[serde(default)]
    pub border: Option<i64>,
}

impl From<OptionsRecord> for RawOptions {
    fn from(record: OptionsRecord) -> Self {
        Self {
            version: Some(i64::from(record.version)),
            error_correction: Some(record.error_correction.as_str().to_string()),
            module_size: Some(i64::from(record.module_size)),
            border: Some(i64::from(record.border)),
        }
    }
}

/// Clamps a raw record into the valid space. Total: every field is
/// independently repaired, missing fields fall back to `defaults`,
/// unparseable error-correction letters fall back to `M`. Settings loaded
/// from disk and settings submitted from the options dialog both pass
/// through here, so the two paths converge on the same valid space.
pub fn normalize(raw: &RawOptions, defaults: &OptionsRecord) -> OptionsRecord {
    let version = match raw.version {
        Some(value) if (i64::from(AUTO_VERSION)..=i64::from(MAX_VERSION)).contains(&value) => {
            value as u32
        }
        Some(_) => AUTO_VERSION,
        None => defaults.version,
    };

    let error_correction = match raw.error_correction.as_deref() {
        Some(letter) => EcLevel::parse(letter).unwrap_or_default(),
        None => defaults.error_correction,
    };

    let module_size = match raw.module_size {
        Some(value) => value.clamp(1, i64::from(u32::MAX)) as u32,
        None => defaults.module_size,
    };

    let border = match raw.border {
        Some(value) => value.clamp(0, i64::from(u32::MAX)) as u32,
        None => defaults.border,
    };

    OptionsRecord {
        version,
        error_correction,
        module_size,
        border,
    }
}
