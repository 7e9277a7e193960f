use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use image::{ImageBuffer, Rgba as ImageRgba};

use crate::raster::Frame;
use crate::runtime::ExportFormat;
use crate::types::SurfaceAlpha;

/// Infers the export format from a path's extension.
pub fn export_format_for(path: &Path) -> Result<ExportFormat> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Ok(ExportFormat::Png),
        None => bail!("export path {} has no extension; expected .png", path.display()),
        Some(other) => bail!("unsupported export format '.{other}'; expected .png"),
    }
}

/// Writes `frame` to `path`, creating parent directories as needed.
pub fn export_png(frame: &Frame, path: &Path, alpha: SurfaceAlpha) -> Result<()> {
    export_format_for(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to prepare export directory {}", parent.display())
        })?;
    }

    let bytes = frame.to_rgba8(alpha);
    let image: ImageBuffer<ImageRgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width(), frame.height(), bytes).ok_or_else(|| {
            anyhow!(
                "frame buffer does not match {}x{}",
                frame.width(),
                frame.height()
            )
        })?;
    image
        .save(path)
        .with_context(|| format!("failed to write image to {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        width = frame.width(),
        height = frame.height(),
        "exported frame"
    );
    Ok(())
}

/// Path of the `index`-th frame inside a sequence directory.
pub fn sequence_frame_path(directory: &Path, index: u64, format: ExportFormat) -> PathBuf {
    directory.join(format!("frame_{index:05}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::RingPattern;
    use crate::raster::rasterize;
    use crate::uniforms::FrameUniforms;
    use tempfile::TempDir;

    #[test]
    fn infers_png_case_insensitively() {
        assert_eq!(
            export_format_for(Path::new("out/Ring.PNG")).unwrap(),
            ExportFormat::Png
        );
        assert!(export_format_for(Path::new("ring.exr")).is_err());
        assert!(export_format_for(Path::new("ring")).is_err());
    }

    #[test]
    fn numbers_sequence_frames() {
        let path = sequence_frame_path(Path::new("frames"), 42, ExportFormat::Png);
        assert_eq!(path, Path::new("frames/frame_00042.png"));
    }

    #[test]
    fn writes_png_with_frame_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/ring.png");
        let frame = rasterize(&RingPattern::default(), &FrameUniforms::at_time(48, 32, 0.0));

        export_png(&frame, &path, SurfaceAlpha::Transparent).unwrap();

        let written = image::open(&path).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (48, 32));
        assert_eq!(written.get_pixel(24, 16).0, [0, 0, 0, 0]);
    }

    #[test]
    fn opaque_export_fills_background() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flat.png");
        let frame = rasterize(&RingPattern::default(), &FrameUniforms::at_time(16, 16, 0.0));

        export_png(
            &frame,
            &path,
            SurfaceAlpha::Opaque {
                background: [0.1, 0.1, 0.1],
            },
        )
        .unwrap();

        let written = image::open(&path).unwrap().to_rgba8();
        assert_eq!(written.get_pixel(8, 8).0, [26, 26, 26, 255]);
        assert!(written.pixels().all(|px| px.0[3] == 255));
    }
}
