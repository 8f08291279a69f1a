use std::path::Path;

use image::ImageFormat;
use thiserror::Error;

use crate::generate::QrArtifact;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing has been generated yet")]
    NoArtifact,
    #[error("io error: {0}")]
    Io(#[from] image::ImageError),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Writes the full-resolution artifact as PNG, unconditionally replacing
/// whatever is at `path`. The scaled preview never goes through here.
pub fn write_png(artifact: &QrArtifact, path: &Path) -> ExportResult<()> {
    artifact.image().save_with_format(path, ImageFormat::Png)?;
    tracing::debug!(
        path = %path.display(),
        width = artifact.width(),
        height = artifact.height(),
        "wrote artifact"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate;
    use crate::options::OptionsRecord;

    fn artifact() -> QrArtifact {
        generate("hello", &OptionsRecord::default()).expect("generation should work")
    }

    #[test]
    fn write_png_produces_a_decodable_file_with_matching_dimensions() {
        let artifact = artifact();
        let path = std::env::temp_dir().join("qrsmith-export-test.png");

        write_png(&artifact, &path).expect("export should succeed");
        let reloaded = image::open(&path).expect("written file should decode");
        assert_eq!(reloaded.width(), artifact.width());
        assert_eq!(reloaded.height(), artifact.height());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn write_png_overwrites_existing_files() {
        let artifact = artifact();
        let path = std::env::temp_dir().join("qrsmith-export-overwrite.png");

        std::fs::write(&path, b"stale bytes").unwrap();
        write_png(&artifact, &path).expect("export should replace the file");
        let reloaded = image::open(&path).expect("written file should decode");
        assert_eq!(reloaded.width(), artifact.width());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn write_png_surfaces_unwritable_paths_as_io_errors() {
        let artifact = artifact();
        let path = std::env::temp_dir().join("qrsmith-no-such-dir/qr.png");

        let err = write_png(&artifact, &path).expect_err("missing parent directory should fail");
        assert!(matches!(err, ExportError::Io(_)));
    }
}
