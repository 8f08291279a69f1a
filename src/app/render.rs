use gtk4::cairo;
use image::RgbaImage;

use crate::preview::PreviewImage;

/// Paints `preview` centered in the drawing area.
pub(super) fn draw_preview(
    context: &cairo::Context,
    area_width: i32,
    area_height: i32,
    preview: &PreviewImage,
) {
    let Some(surface) = rgba_image_to_cairo_surface(preview.image()) else {
        tracing::warn!(
            width = preview.width(),
            height = preview.height(),
            "failed to build preview surface"
        );
        return;
    };

    let x = centered_offset(area_width, preview.width());
    let y = centered_offset(area_height, preview.height());
    context.set_source_surface(&surface, x, y).ok();
    context.paint().ok();
}

/// Cairo's ARGB32 is premultiplied BGRA on little-endian. Artifact pixels
/// are always opaque, so a channel swap is all that is needed.
fn rgba_image_to_cairo_surface(image: &RgbaImage) -> Option<cairo::ImageSurface> {
    let width = i32::try_from(image.width()).ok()?;
    let height = i32::try_from(image.height()).ok()?;
    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;

    {
        let mut data = surface.data().ok()?;
        let row_len = (image.width() as usize).checked_mul(4)?;
        let src = image.as_raw();

        for row in 0..image.height() as usize {
            let src_row = &src[row * row_len..(row + 1) * row_len];
            let dst_start = row.checked_mul(stride)?;
            let dst_row = &mut data[dst_start..dst_start + row_len];

            for (src_pixel, dst_pixel) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4))
            {
                dst_pixel[0] = src_pixel[2];
                dst_pixel[1] = src_pixel[1];
                dst_pixel[2] = src_pixel[0];
                dst_pixel[3] = src_pixel[3];
            }
        }
    }

    surface.flush();
    Some(surface)
}

fn centered_offset(area: i32, content: u32) -> f64 {
    let content = i64::from(content);
    let slack = i64::from(area) - content;
    (slack.max(0) as f64) / 2.0
}
