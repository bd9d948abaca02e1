use gtk4::cairo;

use crate::surface::{Surface, BYTES_PER_PIXEL};

/// Writes one straight-alpha RGBA row as cairo's premultiplied native-endian
/// ARGB32 (BGRA byte order on little-endian hosts).
fn write_premultiplied_row(src_row: &[u8], dst_row: &mut [u8]) {
    for (src_pixel, dst_pixel) in src_row
        .chunks_exact(BYTES_PER_PIXEL)
        .zip(dst_row.chunks_exact_mut(BYTES_PER_PIXEL))
    {
        let [r, g, b, a] = [src_pixel[0], src_pixel[1], src_pixel[2], src_pixel[3]];
        let premultiply = |channel: u8| ((u16::from(channel) * u16::from(a) + 127) / 255) as u8;
        let (r, g, b) = match a {
            0 => (0, 0, 0),
            255 => (r, g, b),
            _ => (premultiply(r), premultiply(g), premultiply(b)),
        };
        dst_pixel.copy_from_slice(&[b, g, r, a]);
    }
}

pub(super) fn surface_to_cairo(surface: &Surface) -> Option<cairo::ImageSurface> {
    if surface.is_empty() {
        return None;
    }
    let width = i32::try_from(surface.width()).ok()?;
    let height = i32::try_from(surface.height()).ok()?;
    let mut image = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(image.stride()).ok()?;
    let src_row_len = usize::try_from(surface.width())
        .ok()?
        .checked_mul(BYTES_PER_PIXEL)?;

    {
        let mut data = image.data().ok()?;
        for (row, src_row) in surface.pixels().chunks_exact(src_row_len).enumerate() {
            let dst_row_offset = row.checked_mul(stride)?;
            let dst_row_end = dst_row_offset.checked_add(src_row_len)?;
            if dst_row_end > data.len() {
                return None;
            }
            write_premultiplied_row(src_row, &mut data[dst_row_offset..dst_row_end]);
        }
    }

    image.flush();
    Some(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_pixels_swap_to_bgra() {
        let mut dst = [0u8; 8];
        write_premultiplied_row(&[10, 20, 30, 255, 200, 100, 50, 255], &mut dst);
        assert_eq!(dst, [30, 20, 10, 255, 50, 100, 200, 255]);
    }

    #[test]
    fn translucent_pixels_are_premultiplied() {
        let mut dst = [0u8; 8];
        write_premultiplied_row(&[255, 128, 0, 128, 90, 90, 90, 0], &mut dst);
        assert_eq!(dst, [0, 64, 128, 128, 0, 0, 0, 0]);
    }
}
