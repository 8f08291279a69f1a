use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::generate::QrArtifact;

/// Floor applied when the preview surface has not been laid out yet or
/// reports a degenerate size.
pub const MIN_REGION_WIDTH: i32 = 300;
pub const MIN_REGION_HEIGHT: i32 = 300;

/// Disposable scaled copy of the current artifact. Recomputed on every
/// resize or regeneration; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    image: RgbaImage,
}

impl PreviewImage {
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

/// Fits `artifact` into the given display region, preserving aspect ratio
/// and never scaling up. Downscales use nearest-neighbor resampling so the
/// hard module edges survive; smoothing filters would smear the pattern.
pub fn scale(artifact: &QrArtifact, region_width: i32, region_height: i32) -> PreviewImage {
    let (width, height) = preview_dimensions(
        artifact.width(),
        artifact.height(),
        region_width,
        region_height,
    );

    if (width, height) == (artifact.width(), artifact.height()) {
        return PreviewImage {
            image: artifact.image().clone(),
        };
    }

    PreviewImage {
        image: imageops::resize(artifact.image(), width, height, FilterType::Nearest),
    }
}

fn preview_dimensions(
    artifact_width: u32,
    artifact_height: u32,
    region_width: i32,
    region_height: i32,
) -> (u32, u32) {
    let region_width = if region_width <= 0 {
        MIN_REGION_WIDTH
    } else {
        region_width
    };
    let region_height = if region_height <= 0 {
        MIN_REGION_HEIGHT
    } else {
        region_height
    };

    let artifact_width = artifact_width.max(1);
    let artifact_height = artifact_height.max(1);

    let factor = (f64::from(region_width) / f64::from(artifact_width))
        .min(f64::from(region_height) / f64::from(artifact_height))
        .min(1.0);
    if factor >= 1.0 {
        return (artifact_width, artifact_height);
    }

    let width = ((f64::from(artifact_width) * factor).floor() as u32).max(1);
    let height = ((f64::from(artifact_height) * factor).floor() as u32).max(1);
    (width, height)
}
