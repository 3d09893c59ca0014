//! Image upload validation.
//!
//! Uploads are checked before anything is sent: the file must exist, fit the
//! size limit, carry an accepted extension, and actually be a JPEG or PNG by
//! its magic bytes.

use crate::config::UploadConfig;
use crate::error::ClassificationError;
use std::io::Cursor;
use std::path::Path;

/// Image formats the classification service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
}

impl UploadFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "image/jpeg",
            UploadFormat::Png => "image/png",
        }
    }
}

/// An image ready to be sent to the classifier.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name sent in the multipart part
    pub file_name: String,
    /// Raw file bytes, sent unmodified
    pub bytes: Vec<u8>,
    /// Format detected from magic bytes
    pub format: UploadFormat,
    /// Width and height read from the image header
    pub dimensions: (u32, u32),
}

impl ImageUpload {
    /// Read and validate an image from disk.
    pub fn from_path(path: &Path, limits: &UploadConfig) -> Result<Self, ClassificationError> {
        if !path.exists() {
            return Err(ClassificationError::FileNotFound(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !limits
            .supported_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(&extension))
        {
            return Err(ClassificationError::UnsupportedFormat {
                name: file_name,
                detail: format!(
                    "extension '{extension}' is not one of {}",
                    limits.supported_formats.join(", ")
                ),
            });
        }

        let metadata = std::fs::metadata(path).map_err(|e| ClassificationError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        check_size(&file_name, metadata.len(), limits)?;

        let bytes = std::fs::read(path).map_err(|e| ClassificationError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_bytes(&file_name, bytes, limits)
    }

    /// Validate raw bytes received from somewhere other than the filesystem.
    pub fn from_bytes(
        file_name: &str,
        bytes: Vec<u8>,
        limits: &UploadConfig,
    ) -> Result<Self, ClassificationError> {
        check_size(file_name, bytes.len() as u64, limits)?;

        let unsupported = |detail: String| ClassificationError::UnsupportedFormat {
            name: file_name.to_string(),
            detail,
        };

        let format = match image::guess_format(&bytes) {
            Ok(image::ImageFormat::Jpeg) => UploadFormat::Jpeg,
            Ok(image::ImageFormat::Png) => UploadFormat::Png,
            Ok(other) => return Err(unsupported(format!("{other:?} is not JPEG or PNG"))),
            Err(_) => return Err(unsupported("not a recognizable image".to_string())),
        };

        let dimensions = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| unsupported(e.to_string()))?
            .into_dimensions()
            .map_err(|e| unsupported(format!("cannot read image header: {e}")))?;

        tracing::debug!(
            file = file_name,
            format = format.mime_type(),
            width = dimensions.0,
            height = dimensions.1,
            "Upload validated"
        );

        Ok(Self {
            file_name: file_name.to_string(),
            bytes,
            format,
            dimensions,
        })
    }
}

fn check_size(name: &str, size: u64, limits: &UploadConfig) -> Result<(), ClassificationError> {
    let max_bytes = limits.max_file_size_mb.saturating_mul(1024 * 1024);
    if size > max_bytes {
        return Err(ClassificationError::FileTooLarge {
            name: name.to_string(),
            size_mb: size / (1024 * 1024),
            max_mb: limits.max_file_size_mb,
        });
    }
    Ok(())
}
