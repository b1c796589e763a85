use std::path::{Path, PathBuf};

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Typographic points per inch; style sizes are given in points.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Resolution of vector output, in SVG user units (CSS pixels) per inch.
pub const VECTOR_DPI: f64 = 96.0;

// ---------------------------------------------------------------------------
// Render – anything that can draw itself onto a plotters backend
// ---------------------------------------------------------------------------

pub trait Render {
    /// Draw onto `root`. `scale` is the number of backend pixels per point.
    fn render<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, scale: f64) -> Result<(), RenderError>;
}

// ---------------------------------------------------------------------------
// Output formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Vector.
    Svg,
    /// Lossless raster.
    Png,
    /// Compressed raster.
    Jpeg,
    /// Lossless raster, the usual journal submission format.
    Tiff,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Tiff => "tiff",
        }
    }

    fn raster_format(self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Svg => None,
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
        }
    }
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Writes one figure to several files that share a base name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exporter {
    /// Raster resolution in dots per inch.
    pub dpi: f64,
    pub width_in: f64,
    pub height_in: f64,
}

impl Exporter {
    pub fn new(dpi: f64, width_in: f64, height_in: f64) -> Self {
        Exporter {
            dpi,
            width_in,
            height_in,
        }
    }

    fn pixel_size(&self, dpi: f64) -> (u32, u32) {
        (
            (self.width_in * dpi).round().max(1.0) as u32,
            (self.height_in * dpi).round().max(1.0) as u32,
        )
    }

    /// Write `<dir>/<base_name>.<ext>` for every format, in order.
    ///
    /// Stops at the first failure; files written before it are left in place.
    pub fn export<R: Render>(
        &self,
        figure: &R,
        dir: &Path,
        base_name: &str,
        formats: &[ImageFormat],
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(formats.len());
        for &format in formats {
            let path = dir.join(format!("{base_name}.{}", format.extension()));
            match format.raster_format() {
                None => self.write_vector(figure, &path)?,
                Some(encoding) => self.write_raster(figure, &path, encoding)?,
            }
            info!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn write_vector<R: Render>(&self, figure: &R, path: &Path) -> Result<(), RenderError> {
        let root = SVGBackend::new(path, self.pixel_size(VECTOR_DPI)).into_drawing_area();
        figure.render(&root, VECTOR_DPI / POINTS_PER_INCH)?;
        root.present()?;
        Ok(())
    }

    /// Render into an RGB buffer and let `image` pick the encoder.
    fn write_raster<R: Render>(
        &self,
        figure: &R,
        path: &Path,
        encoding: image::ImageFormat,
    ) -> Result<(), RenderError> {
        let (width, height) = self.pixel_size(self.dpi);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            figure.render(&root, self.dpi / POINTS_PER_INCH)?;
            root.present()?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Backend(String::from("pixel buffer does not match image size")))?;
        img.save_with_format(path, encoding)
            .map_err(|source| RenderError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shapes only, so the test does not depend on installed fonts.
    struct Swatch;

    impl Render for Swatch {
        fn render<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, scale: f64) -> Result<(), RenderError> {
            root.fill(&WHITE)?;
            let side = (10.0 * scale) as i32;
            root.draw(&Rectangle::new([(2, 2), (2 + side, 2 + side)], RGBColor(0x2c, 0xa0, 0x2c).filled()))?;
            root.draw(&Circle::new((side, side), side / 3, BLACK.stroke_width(1)))?;
            Ok(())
        }
    }

    #[test]
    fn writes_one_non_empty_file_per_format() {
        let dir = tempfile::tempdir().unwrap();
        let formats = [ImageFormat::Svg, ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Tiff];
        let exporter = Exporter::new(20.0, 3.0, 2.0);

        let written = exporter.export(&Swatch, dir.path(), "Volume_by_morph", &formats).unwrap();

        assert_eq!(written.len(), formats.len());
        for (path, format) in written.iter().zip(formats) {
            assert_eq!(path.extension().unwrap(), format.extension());
            assert_eq!(path.file_stem().unwrap(), "Volume_by_morph");
            assert!(std::fs::metadata(path).unwrap().len() > 0, "{} is empty", path.display());
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), formats.len());
    }

    #[test]
    fn raster_size_follows_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(30.0, 2.0, 1.5);
        let written = exporter.export(&Swatch, dir.path(), "swatch", &[ImageFormat::Png]).unwrap();

        let img = image::open(&written[0]).unwrap();
        assert_eq!((img.width(), img.height()), (60, 45));
    }

    #[test]
    fn unwritable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = Exporter::new(10.0, 1.0, 1.0)
            .export(&Swatch, &blocker, "swatch", &[ImageFormat::Png])
            .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
