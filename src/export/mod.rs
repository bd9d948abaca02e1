//! Off-screen export of the gradient at an arbitrary resolution.

use std::time::Duration;

use image::RgbaImage;

use crate::gradient::{self, CornerColors, GradientSpan};
use crate::surface::{
    decode_data_url, load_image, ImageKind, Surface, SurfaceError, SurfaceResult,
    DEFAULT_JPEG_QUALITY,
};

/// Pause between confirming an export and producing it, so the cleared
/// download link and the loading indicator are visible.
pub const EXPORT_FEEDBACK_DELAY: Duration = Duration::from_millis(500);

pub const DEFAULT_FILE_STEM: &str = "wallpaper";

/// Largest export width or height, in pixels.
pub const MAX_EXPORT_DIMENSION: u32 = 16_384;

/// Clamps a requested dimension to `1..=MAX_EXPORT_DIMENSION`.
pub fn clamp_dimension(value: i64) -> u32 {
    let clamped = value.clamp(1, i64::from(MAX_EXPORT_DIMENSION));
    u32::try_from(clamped).unwrap_or(MAX_EXPORT_DIMENSION)
}

/// Where the export resolution comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Tracks the displayed surface on every resize.
    #[default]
    FollowDisplay,
    /// Fixed to the screen resolution at the time it was requested.
    FollowScreen,
    /// Typed in by the user.
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSettings {
    pub kind: ImageKind,
    pub jpeg_quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            kind: ImageKind::Jpeg,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub settings: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub kind: ImageKind,
}

impl ExportArtifact {
    pub fn bytes(&self) -> SurfaceResult<Vec<u8>> {
        Ok(decode_data_url(&self.data_url)?.bytes)
    }

    pub fn load_image(&self) -> SurfaceResult<RgbaImage> {
        load_image(&self.bytes()?)
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.kind.extension())
    }
}

/// Renders `corners` at the requested resolution and encodes it, then puts the
/// surface back to its live size and content. The surface is restored even
/// when encoding fails. Requests above `MAX_EXPORT_DIMENSION` are rejected
/// before anything is allocated.
pub fn render_export(
    surface: &mut Surface,
    corners: &CornerColors,
    span: GradientSpan,
    request: &ExportRequest,
) -> SurfaceResult<ExportArtifact> {
    if request.width > MAX_EXPORT_DIMENSION || request.height > MAX_EXPORT_DIMENSION {
        tracing::warn!(
            export_id = request.id,
            width = request.width,
            height = request.height,
            max = MAX_EXPORT_DIMENSION,
            "export size over limit"
        );
        return Err(SurfaceError::TooLarge {
            width: request.width,
            height: request.height,
        });
    }
    let (live_width, live_height) = surface.size();

    let encoded = surface.resize(request.width, request.height).and_then(|()| {
        gradient::render_with(surface, corners, span);
        surface.to_data_url(request.settings.kind, request.settings.jpeg_quality)
    });

    surface.resize(live_width, live_height)?;
    gradient::render_with(surface, corners, span);

    let data_url = encoded?;
    tracing::info!(
        export_id = request.id,
        width = request.width,
        height = request.height,
        kind = %request.settings.kind,
        url_len = data_url.len(),
        "generated export artifact"
    );
    Ok(ExportArtifact {
        data_url,
        width: request.width,
        height: request.height,
        kind: request.settings.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn corners() -> CornerColors {
        [
            Color::opaque(255, 0, 0),
            Color::opaque(0, 255, 0),
            Color::opaque(0, 0, 255),
            Color::opaque(255, 255, 255),
        ]
    }

    fn request(width: u32, height: u32, kind: ImageKind) -> ExportRequest {
        ExportRequest {
            id: 1,
            width,
            height,
            settings: ExportSettings {
                kind,
                ..ExportSettings::default()
            },
        }
    }

    #[test]
    fn export_has_requested_resolution_and_restores_live_surface() {
        let mut surface = Surface::new(40, 30).expect("surface should allocate");
        gradient::render(&mut surface, &corners());
        let live = surface.clone();

        let artifact = render_export(
            &mut surface,
            &corners(),
            GradientSpan::Inclusive,
            &request(100, 50, ImageKind::Jpeg),
        )
        .expect("export should succeed");

        assert_eq!((artifact.width, artifact.height), (100, 50));
        assert!(artifact.data_url.starts_with("data:image/jpeg;base64,"));
        let image = artifact.load_image().expect("artifact should decode");
        assert_eq!(image.dimensions(), (100, 50));
        assert_eq!(surface, live);
    }

    #[test]
    fn png_export_keeps_corner_pixels_exact() {
        let mut surface = Surface::new(5, 5).expect("surface should allocate");
        let artifact = render_export(
            &mut surface,
            &corners(),
            GradientSpan::Inclusive,
            &request(3, 3, ImageKind::Png),
        )
        .expect("export should succeed");
        let image = artifact.load_image().expect("png should decode");
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(artifact.file_name(DEFAULT_FILE_STEM), "wallpaper.png");
    }

    #[test]
    fn failed_encoding_still_restores_the_live_surface() {
        let mut surface = Surface::new(8, 4).expect("surface should allocate");
        gradient::render(&mut surface, &corners());
        let live = surface.clone();

        let err = render_export(
            &mut surface,
            &corners(),
            GradientSpan::Inclusive,
            &request(0, 10, ImageKind::Jpeg),
        )
        .expect_err("zero width cannot be encoded");
        assert!(matches!(err, SurfaceError::EmptySurface { .. }));
        assert_eq!(surface, live);
    }

    #[test]
    fn over_limit_request_is_rejected_and_live_surface_kept() {
        let mut surface = Surface::new(8, 4).expect("surface should allocate");
        gradient::render(&mut surface, &corners());
        let live = surface.clone();

        let err = render_export(
            &mut surface,
            &corners(),
            GradientSpan::Inclusive,
            &request(u32::MAX, MAX_EXPORT_DIMENSION, ImageKind::Png),
        )
        .expect_err("oversized export should be rejected");
        assert!(matches!(
            err,
            SurfaceError::TooLarge {
                width: u32::MAX,
                height: MAX_EXPORT_DIMENSION
            }
        ));
        assert_eq!(surface, live);
    }

    #[test]
    fn requested_dimensions_clamp_into_the_export_range() {
        assert_eq!(clamp_dimension(i64::MIN), 1);
        assert_eq!(clamp_dimension(0), 1);
        assert_eq!(clamp_dimension(1920), 1920);
        assert_eq!(clamp_dimension(i64::MAX), MAX_EXPORT_DIMENSION);
    }
}
