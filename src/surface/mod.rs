//! Owned RGBA8 drawing surface plus image/data-URL encoding.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use serde::Deserialize;
use thiserror::Error;

pub const BYTES_PER_PIXEL: usize = 4;
pub const DEFAULT_JPEG_QUALITY: u8 = 92;
const DATA_URL_PREFIX: &str = "data:";
const DATA_URL_BASE64_MARKER: &str = ";base64,";

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface is empty ({width}x{height}); nothing to encode")]
    EmptySurface { width: u32, height: u32 },
    #[error("pixel buffer holds {actual} bytes but {width}x{height} needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("failed to encode {kind} image")]
    Encode {
        kind: ImageKind,
        #[source]
        source: image::ImageError,
    },
    #[error("{width}x{height} exceeds the maximum surface size")]
    TooLarge { width: u32, height: u32 },
    #[error("invalid data url: {0}")]
    DataUrl(&'static str),
    #[error("invalid base64 payload")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to decode image")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    #[default]
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
}

impl ImageKind {
    pub const fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
        })
    }
}

impl FromStr for ImageKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageKind::Jpeg),
            "png" => Ok(ImageKind::Png),
            other => Err(format!("unsupported image format {other:?}; expected jpeg or png")),
        }
    }
}

/// Detached copy of a surface's pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// `None` when the RGBA buffer for `width x height` would overflow `usize`.
pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Byte offset of pixel `(x, y)` in a row-major RGBA buffer.
pub fn pixel_offset(x: u32, y: u32, width: u32) -> usize {
    (x as usize + y as usize * width as usize) * BYTES_PER_PIXEL
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        let mut surface = Self::default();
        surface.resize(width, height)?;
        Ok(surface)
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Changes the resolution. Like a canvas, the content is cleared even when
    /// the size is unchanged. An oversized request leaves the surface as it was.
    pub fn resize(&mut self, width: u32, height: u32) -> SurfaceResult<()> {
        let len = buffer_len(width, height).ok_or(SurfaceError::TooLarge { width, height })?;
        tracing::trace!(
            from_width = self.width,
            from_height = self.height,
            width,
            height,
            "resize surface"
        );
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(len, 0);
        Ok(())
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = pixel_offset(x, y, self.width);
        let bytes = self.pixels.get(offset..offset + BYTES_PER_PIXEL)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn image_data(&self) -> ImageData {
        ImageData {
            width: self.width,
            height: self.height,
            data: self.pixels.clone(),
        }
    }

    pub fn put_image_data(&mut self, image: &ImageData) -> SurfaceResult<()> {
        let expected = buffer_len(image.width, image.height).ok_or(SurfaceError::TooLarge {
            width: image.width,
            height: image.height,
        })?;
        if image.data.len() != expected {
            return Err(SurfaceError::BufferSize {
                width: image.width,
                height: image.height,
                expected,
                actual: image.data.len(),
            });
        }
        self.width = image.width;
        self.height = image.height;
        self.pixels.clone_from(&image.data);
        Ok(())
    }

    pub fn to_rgba_image(&self) -> SurfaceResult<RgbaImage> {
        let empty = || SurfaceError::EmptySurface {
            width: self.width,
            height: self.height,
        };
        if self.is_empty() {
            return Err(empty());
        }
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(empty)
    }

    /// Encodes the current content. JPEG output drops the alpha channel.
    pub fn encode(&self, kind: ImageKind, jpeg_quality: u8) -> SurfaceResult<Vec<u8>> {
        let image = self.to_rgba_image()?;
        let mut bytes = Vec::new();
        let written = match kind {
            ImageKind::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
                rgb.write_with_encoder(JpegEncoder::new_with_quality(
                    &mut bytes,
                    jpeg_quality.clamp(1, 100),
                ))
            }
            ImageKind::Png => image.write_with_encoder(PngEncoder::new(&mut bytes)),
        };
        written.map_err(|source| SurfaceError::Encode { kind, source })?;
        tracing::debug!(
            %kind,
            width = self.width,
            height = self.height,
            encoded_bytes = bytes.len(),
            "encoded surface"
        );
        Ok(bytes)
    }

    pub fn to_data_url(&self, kind: ImageKind, jpeg_quality: u8) -> SurfaceResult<String> {
        let bytes = self.encode(kind, jpeg_quality)?;
        Ok(format!(
            "{DATA_URL_PREFIX}{}{DATA_URL_BASE64_MARKER}{}",
            kind.mime_type(),
            STANDARD.encode(bytes)
        ))
    }
}

/// Raw payload of a `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrlPayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn decode_data_url(url: &str) -> SurfaceResult<DataUrlPayload> {
    let rest = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or(SurfaceError::DataUrl("missing data: prefix"))?;
    let (mime_type, encoded) = rest
        .split_once(DATA_URL_BASE64_MARKER)
        .ok_or(SurfaceError::DataUrl("missing ;base64, marker"))?;
    let bytes = STANDARD.decode(encoded)?;
    Ok(DataUrlPayload {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

pub fn load_image(bytes: &[u8]) -> SurfaceResult<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Surface {
        let mut surface = Surface::new(width, height).expect("surface should allocate");
        for pixel in surface.pixels_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgba);
        }
        surface
    }

    #[test]
    fn resize_reallocates_and_clears_content() {
        let mut surface = filled(2, 2, [9, 9, 9, 255]);
        surface.resize(3, 1).expect("small resize should succeed");
        assert_eq!(surface.size(), (3, 1));
        assert_eq!(surface.pixels().len(), 12);
        assert!(surface.pixels().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn oversized_resize_is_rejected_without_touching_content() {
        let mut surface = filled(2, 2, [9, 9, 9, 255]);
        let before = surface.clone();

        let err = surface
            .resize(u32::MAX, u32::MAX)
            .expect_err("overflowing buffer should be rejected");
        assert!(matches!(
            err,
            SurfaceError::TooLarge {
                width: u32::MAX,
                height: u32::MAX
            }
        ));
        assert_eq!(surface, before);
        assert!(Surface::new(u32::MAX, u32::MAX).is_err());
        assert_eq!(buffer_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn pixel_reads_row_major_offsets_and_rejects_out_of_bounds() {
        let mut surface = Surface::new(3, 2).expect("surface should allocate");
        let offset = pixel_offset(2, 1, 3);
        assert_eq!(offset, 20);
        surface.pixels_mut()[offset..offset + 4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(surface.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(surface.pixel(3, 0), None);
        assert_eq!(surface.pixel(0, 2), None);
    }

    #[test]
    fn put_image_data_rejects_mismatched_buffers() {
        let mut surface = Surface::new(1, 1).expect("surface should allocate");
        let err = surface
            .put_image_data(&ImageData {
                width: 2,
                height: 2,
                data: vec![0; 4],
            })
            .expect_err("short buffer should be rejected");
        assert!(matches!(
            err,
            SurfaceError::BufferSize {
                expected: 16,
                actual: 4,
                ..
            }
        ));

        let copy = filled(2, 1, [5, 6, 7, 8]).image_data();
        surface
            .put_image_data(&copy)
            .expect("matching buffer should be accepted");
        assert_eq!(surface.pixel(1, 0), Some([5, 6, 7, 8]));
    }

    #[test]
    fn encoding_an_empty_surface_is_an_error() {
        let surface = Surface::new(0, 4).expect("surface should allocate");
        let err = surface
            .to_data_url(ImageKind::Jpeg, DEFAULT_JPEG_QUALITY)
            .expect_err("empty surface should not encode");
        assert!(matches!(
            err,
            SurfaceError::EmptySurface {
                width: 0,
                height: 4
            }
        ));
    }

    #[test]
    fn jpeg_data_url_decodes_to_the_surface_resolution() {
        let surface = filled(7, 3, [200, 40, 90, 255]);
        let url = surface
            .to_data_url(ImageKind::Jpeg, DEFAULT_JPEG_QUALITY)
            .expect("jpeg encoding should succeed");
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let payload = decode_data_url(&url).expect("data url should decode");
        assert_eq!(payload.mime_type, "image/jpeg");
        let image = load_image(&payload.bytes).expect("jpeg should load");
        assert_eq!(image.dimensions(), (7, 3));
    }

    #[test]
    fn png_keeps_exact_pixels() {
        let surface = filled(2, 2, [10, 20, 30, 255]);
        let bytes = surface
            .encode(ImageKind::Png, DEFAULT_JPEG_QUALITY)
            .expect("png encoding should succeed");
        let image = load_image(&bytes).expect("png should load");
        assert_eq!(image.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn malformed_data_urls_are_reported() {
        assert!(matches!(
            decode_data_url("image/png;base64,AAAA"),
            Err(SurfaceError::DataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png,AAAA"),
            Err(SurfaceError::DataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(SurfaceError::Base64(_))
        ));
        assert!(matches!(load_image(b"not an image"), Err(SurfaceError::Decode(_))));
    }

    #[test]
    fn image_kind_parses_aliases() {
        assert_eq!("JPG".parse::<ImageKind>().unwrap(), ImageKind::Jpeg);
        assert_eq!("png".parse::<ImageKind>().unwrap(), ImageKind::Png);
        assert!("gif".parse::<ImageKind>().is_err());
        assert_eq!(ImageKind::from_mime_type("image/png"), Some(ImageKind::Png));
    }
}
