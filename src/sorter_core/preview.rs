use crate::sorter_core::error::{Result, SorterError};
use image::{ImageError, ImageReader};
use std::fs;
use std::path::Path;

/// What the front end shows about the photo under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub file_name: String,
    pub file_size: u64,
    pub dimensions: Option<(u32, u32)>,
    pub format: Option<String>,
}

impl std::fmt::Display for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name)?;
        if let Some((width, height)) = self.dimensions {
            write!(f, " {}x{}", width, height)?;
        }
        if let Some(format) = &self.format {
            write!(f, " {}", format)?;
        }
        write!(f, " ({:.1} KB)", self.file_size as f64 / 1024.0)
    }
}

/// Turns a photo path into something the front end can render.
pub trait PreviewDecoder {
    fn describe(&self, path: &Path) -> Result<Preview>;
}

/// Decodes the full raster with the `image` crate.
#[derive(Debug, Default)]
pub struct RasterPreview;

impl PreviewDecoder for RasterPreview {
    fn describe(&self, path: &Path) -> Result<Preview> {
        let mut preview = MetadataPreview.describe(path)?;

        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| SorterError::UnsupportedFormat(path.to_path_buf()))?;

        let image = reader.decode().map_err(|e| match e {
            ImageError::Unsupported(_) => SorterError::UnsupportedFormat(path.to_path_buf()),
            ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                SorterError::FileMissing(path.to_path_buf())
            }
            other => SorterError::CorruptFile {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        preview.dimensions = Some((image.width(), image.height()));
        preview.format = Some(format!("{:?}", format).to_uppercase());
        log::debug!("Decoded {}", preview);
        Ok(preview)
    }
}

/// File name and size only; nothing is decoded.
#[derive(Debug, Default)]
pub struct MetadataPreview;

impl PreviewDecoder for MetadataPreview {
    fn describe(&self, path: &Path) -> Result<Preview> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SorterError::FileMissing(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Preview {
            file_name: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            file_size: metadata.len(),
            dimensions: None,
            format: None,
        })
    }
}
