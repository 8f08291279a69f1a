use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::encode::{EncodeBackend, ModuleMatrix, RegistryEncodeBackend, VersionPolicy};
use crate::options::OptionsRecord;

const FOREGROUND: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xFF]);
const BACKGROUND: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no text to encode")]
    EmptyInput,
    #[error("encoding failed: {message}")]
    Encoding { message: String },
}

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

/// Full-resolution raster produced by one generation request. Immutable;
/// every generation yields a fresh artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrArtifact {
    image: RgbaImage,
}

impl QrArtifact {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

pub fn generate(text: &str, options: &OptionsRecord) -> GenerateResult<QrArtifact> {
    generate_with(&RegistryEncodeBackend, text, options)
}

/// Encodes `text` through `backend` and rasterizes the module matrix at
/// `module_size` pixels per module with `border` quiet-zone modules on
/// every edge. Blank input is rejected before the encoder runs; every
/// encoder failure re-surfaces uniformly with its diagnostic attached.
pub fn generate_with<B: EncodeBackend>(
    backend: &B,
    text: &str,
    options: &OptionsRecord,
) -> GenerateResult<QrArtifact> {
    if text.trim().is_empty() {
        return Err(GenerateError::EmptyInput);
    }

    let matrix = backend
        .encode(
            text,
            VersionPolicy::from_version(options.version),
            options.error_correction,
        )
        .map_err(|err| GenerateError::Encoding {
            message: err.to_string(),
        })?;

    Ok(QrArtifact {
        image: render_matrix(&matrix, options.module_size, options.border),
    })
}

fn render_matrix(matrix: &ModuleMatrix, module_size: u32, border: u32) -> RgbaImage {
    let module_size = module_size.max(1);
    let modules_per_edge = matrix.size().saturating_add(border.saturating_mul(2));
    let dimension = modules_per_edge.saturating_mul(module_size);

    let mut image = RgbaImage::from_pixel(dimension, dimension, BACKGROUND);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let module_x = x / module_size;
        let module_y = y / module_size;
        let inside = module_x >= border
            && module_y >= border
            && module_x - border < matrix.size()
            && module_y - border < matrix.size();
        if inside && matrix.is_dark(module_x - border, module_y - border) {
            *pixel = FOREGROUND;
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{EncodeError, EncodeResult};
    use crate::options::EcLevel;
    use std::cell::RefCell;

    struct FakeEncodeBackend {
        matrix_size: u32,
        fail_with: Option<String>,
        calls: RefCell<Vec<(String, VersionPolicy, EcLevel)>>,
    }

    impl FakeEncodeBackend {
        fn new(matrix_size: u32) -> Self {
            Self {
                matrix_size,
                fail_with: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                matrix_size: 0,
                fail_with: Some(message.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }

        /// Checkerboard: (x + y) even is dark, so (0,0) is always dark.
        fn checkerboard(size: u32) -> ModuleMatrix {
            let modules = (0..size * size)
                .map(|index| {
                    let x = index % size;
                    let y = index / size;
                    (x + y) % 2 == 0
                })
                .collect();
            ModuleMatrix::new(size, modules).expect("checkerboard dimensions are consistent")
        }
    }

    impl EncodeBackend for FakeEncodeBackend {
        fn encode(
            &self,
            text: &str,
            policy: VersionPolicy,
            level: EcLevel,
        ) -> EncodeResult<ModuleMatrix> {
            self.calls
                .borrow_mut()
                .push((text.to_string(), policy, level));
            if let Some(message) = &self.fail_with {
                return Err(EncodeError::Rejected {
                    message: message.clone(),
                });
            }
            Ok(Self::checkerboard(self.matrix_size))
        }
    }

    fn options(version: u32, module_size: u32, border: u32) -> OptionsRecord {
        OptionsRecord {
            version,
            error_correction: EcLevel::M,
            module_size,
            border,
        }
    }

    #[test]
    fn blank_input_is_rejected_before_the_encoder_runs() {
        let backend = FakeEncodeBackend::new(21);
        for text in ["", "   ", "\n\t "] {
            let err = generate_with(&backend, text, &options(0, 10, 4))
                .expect_err("blank input must not reach the encoder");
            assert!(matches!(err, GenerateError::EmptyInput));
        }
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn version_zero_requests_auto_sizing() {
        let backend = FakeEncodeBackend::new(21);
        generate_with(&backend, "hello", &options(0, 1, 0)).expect("generation should succeed");
        assert_eq!(backend.calls.borrow()[0].1, VersionPolicy::Auto);
    }

    #[test]
    fn pinned_version_is_passed_through_exactly() {
        let backend = FakeEncodeBackend::new(37);
        generate_with(&backend, "hello", &options(5, 1, 0)).expect("generation should succeed");
        assert_eq!(backend.calls.borrow()[0].1, VersionPolicy::Exact(5));
    }

    #[test]
    fn encoder_failures_resurface_with_their_diagnostic() {
        let backend = FakeEncodeBackend::failing("data too long");
        let err = generate_with(&backend, "hello", &options(1, 1, 0))
            .expect_err("backend failure must bubble");
        match err {
            GenerateError::Encoding { message } => assert_eq!(message, "data too long"),
            other => panic!("expected Encoding, got {other:?}"),
        }
    }

    #[test]
    fn raster_dimensions_cover_modules_plus_quiet_zone() {
        let backend = FakeEncodeBackend::new(21);
        let artifact =
            generate_with(&backend, "hello", &options(0, 10, 4)).expect("generation should work");
        // (21 + 2*4) * 10
        assert_eq!(artifact.width(), 290);
        assert_eq!(artifact.height(), 290);
    }

    #[test]
    fn quiet_zone_stays_background_and_modules_fill_their_cells() {
        let backend = FakeEncodeBackend::new(3);
        let artifact =
            generate_with(&backend, "hello", &options(0, 4, 2)).expect("generation should work");
        let image = artifact.image();

        // Every border pixel is background.
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*image.get_pixel(7, 7), BACKGROUND);
        assert_eq!(*image.get_pixel(artifact.width() - 1, 0), BACKGROUND);

        // Module (0,0) is dark in the checkerboard; its cell starts at 2*4.
        assert_eq!(*image.get_pixel(8, 8), FOREGROUND);
        assert_eq!(*image.get_pixel(11, 11), FOREGROUND);
        // Module (1,0) is light.
        assert_eq!(*image.get_pixel(12, 8), BACKGROUND);
    }

    #[test]
    fn identical_inputs_yield_byte_identical_artifacts() {
        let opts = options(0, 10, 4);
        let first = generate("hello", &opts).expect("generation should work");
        let second = generate("hello", &opts).expect("generation should work");
        assert_eq!(first, second);
    }

    #[test]
    fn end_to_end_square_bordered_artifact_through_the_real_encoder() {
        let opts = options(0, 10, 4);
        let artifact = generate("hello", &opts).expect("generation should work");
        assert_eq!(artifact.width(), artifact.height());
        // version 1 matrix (21 modules) plus 4 quiet-zone modules per edge
        assert_eq!(artifact.width(), (21 + 8) * 10);
        assert_eq!(*artifact.image().get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn pinned_version_too_small_fails_while_auto_succeeds() {
        let text = "x".repeat(200);
        let pinned = options(1, 1, 0);
        let err = generate(&text, &pinned).expect_err("version 1 cannot hold 200 bytes");
        assert!(matches!(err, GenerateError::Encoding { message: _ }));

        let auto = options(0, 1, 0);
        let artifact = generate(&text, &auto).expect("auto mode should grow the version");
        assert!(artifact.width() > 21);
    }

    #[test]
    fn surrounding_whitespace_is_preserved_in_the_encoded_payload() {
        let backend = FakeEncodeBackend::new(21);
        generate_with(&backend, " hello ", &options(0, 1, 0)).expect("generation should succeed");
        assert_eq!(backend.calls.borrow()[0].0, " hello ");
    }
}
