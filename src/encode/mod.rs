use thiserror::Error;

use crate::options::{EcLevel, AUTO_VERSION};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{message}")]
    Rejected { message: String },
    #[error("encoder produced a malformed matrix: {message}")]
    MalformedMatrix { message: String },
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

/// Structural size request handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Smallest version that fits the data at the requested level.
    Auto,
    /// Exact version 1–40; the encoder must fail when the data does not fit.
    Exact(u32),
}

impl VersionPolicy {
    pub fn from_version(version: u32) -> Self {
        if version == AUTO_VERSION {
            Self::Auto
        } else {
            Self::Exact(version)
        }
    }
}

/// Square grid of dark/light modules as produced by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: u32,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    pub fn new(size: u32, modules: Vec<bool>) -> EncodeResult<Self> {
        let expected = (size as usize).checked_mul(size as usize);
        if size == 0 || expected != Some(modules.len()) {
            return Err(EncodeError::MalformedMatrix {
                message: format!(
                    "expected {size}x{size} modules, got {len}",
                    len = modules.len()
                ),
            });
        }
        Ok(Self { size, modules })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Caller keeps coordinates inside `0..size`.
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        self.modules[(y as usize) * (self.size as usize) + (x as usize)]
    }
}

/// The external encoding capability. The rest of the crate only depends on
/// this seam; tests substitute fakes for it.
pub trait EncodeBackend {
    fn encode(&self, text: &str, policy: VersionPolicy, level: EcLevel)
        -> EncodeResult<ModuleMatrix>;
}

/// [`EncodeBackend`] backed by the `qrcode` registry crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryEncodeBackend;

impl EncodeBackend for RegistryEncodeBackend {
    fn encode(
        &self,
        text: &str,
        policy: VersionPolicy,
        level: EcLevel,
    ) -> EncodeResult<ModuleMatrix> {
        let ec_level = registry_ec_level(level);
        let code = match policy {
            VersionPolicy::Auto => {
                qrcode::QrCode::with_error_correction_level(text.as_bytes(), ec_level)
            }
            VersionPolicy::Exact(version) => qrcode::QrCode::with_version(
                text.as_bytes(),
                qrcode::Version::Normal(version as i16),
                ec_level,
            ),
        }
        .map_err(|err| EncodeError::Rejected {
            message: err.to_string(),
        })?;

        let size =
            u32::try_from(code.width()).map_err(|_| EncodeError::MalformedMatrix {
                message: format!("module count {} exceeds u32", code.width()),
            })?;
        let modules = code
            .to_colors()
            .iter()
            .map(|color| *color == qrcode::Color::Dark)
            .collect();
        ModuleMatrix::new(size, modules)
    }
}

fn registry_ec_level(level: EcLevel) -> qrcode::EcLevel {
    match level {
        EcLevel::L => qrcode::EcLevel::L,
        EcLevel::M => qrcode::EcLevel::M,
        EcLevel::Q => qrcode::EcLevel::Q,
        EcLevel::H => qrcode::EcLevel::H,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_count_for_version(version: u32) -> u32 {
        17 + 4 * version
    }

    #[test]
    fn version_policy_maps_zero_to_auto() {
        assert_eq!(VersionPolicy::from_version(0), VersionPolicy::Auto);
        assert_eq!(VersionPolicy::from_version(3), VersionPolicy::Exact(3));
    }

    #[test]
    fn module_matrix_rejects_mismatched_lengths() {
        let err = ModuleMatrix::new(3, vec![false; 8]).expect_err("8 != 3x3");
        assert!(matches!(err, EncodeError::MalformedMatrix { message: _ }));
        assert!(ModuleMatrix::new(0, Vec::new()).is_err());
    }

    #[test]
    fn module_matrix_indexes_row_major() {
        let mut modules = vec![false; 4];
        modules[1] = true; // (x=1, y=0)
        let matrix = ModuleMatrix::new(2, modules).expect("2x2 should build");
        assert!(matrix.is_dark(1, 0));
        assert!(!matrix.is_dark(0, 1));
    }

    #[test]
    fn registry_backend_auto_fits_short_text_into_version_one() {
        let matrix = RegistryEncodeBackend
            .encode("hello", VersionPolicy::Auto, EcLevel::M)
            .expect("short text should encode");
        assert_eq!(matrix.size(), module_count_for_version(1));
    }

    #[test]
    fn registry_backend_pins_exact_versions() {
        let matrix = RegistryEncodeBackend
            .encode("hello", VersionPolicy::Exact(5), EcLevel::M)
            .expect("version 5 easily fits the text");
        assert_eq!(matrix.size(), module_count_for_version(5));
    }

    #[test]
    fn registry_backend_rejects_data_too_large_for_pinned_version() {
        let text = "x".repeat(200);
        let err = RegistryEncodeBackend
            .encode(&text, VersionPolicy::Exact(1), EcLevel::H)
            .expect_err("200 bytes cannot fit version 1 at H");
        assert!(matches!(err, EncodeError::Rejected { message: _ }));
    }

    #[test]
    fn registry_backend_auto_grows_version_for_large_data() {
        let text = "x".repeat(200);
        let matrix = RegistryEncodeBackend
            .encode(&text, VersionPolicy::Auto, EcLevel::H)
            .expect("auto mode should pick a fitting version");
        assert!(matrix.size() > module_count_for_version(1));
    }

    #[test]
    fn registry_backend_higher_redundancy_never_shrinks_the_matrix() {
        let text = "the quick brown fox jumps over the lazy dog";
        let low = RegistryEncodeBackend
            .encode(text, VersionPolicy::Auto, EcLevel::L)
            .expect("L should encode");
        let high = RegistryEncodeBackend
            .encode(text, VersionPolicy::Auto, EcLevel::H)
            .expect("H should encode");
        assert!(high.size() >= low.size());
    }
}
