//! ECG image selection: type and size checks, then data URL encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tracing::debug;

use crate::error::UploadError;

/// Largest accepted image, 10 MiB.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    Bmp,
}

impl ImageType {
    pub fn mime(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Bmp => "image/bmp",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(ImageType::Jpeg),
            "image/png" => Some(ImageType::Png),
            "image/bmp" => Some(ImageType::Bmp),
            _ => None,
        }
    }
}

/// A file picked by the user, before any checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// "{name} ({size} KB)", as shown next to the preview.
    pub fn summary(&self) -> String {
        format!("{} ({:.2} KB)", self.name, self.size() as f64 / 1024.0)
    }

    /// Read a file from disk, taking its type from the extension. Type and
    /// size are checked before any bytes are read.
    pub async fn load(path: &Path) -> Result<Self, UploadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let read_error = |source| UploadError::Read {
            name: name.clone(),
            source,
        };

        let mime = mime_for_path(path);
        if ImageType::from_mime(mime).is_none() {
            return Err(UploadError::UnsupportedType { mime: mime.into() });
        }
        let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
        if size > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge { size });
        }

        let bytes = tokio::fs::read(path).await.map_err(read_error)?;
        Ok(Self::new(name, mime, bytes))
    }
}

/// Media type implied by a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Type first, then size; the first failing check is the one reported.
pub fn validate(file: &SelectedFile) -> Result<ImageType, UploadError> {
    let kind = ImageType::from_mime(&file.mime).ok_or_else(|| UploadError::UnsupportedType {
        mime: file.mime.clone(),
    })?;
    if file.size() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge { size: file.size() });
    }
    Ok(kind)
}

/// An accepted image, encoded as the data URL sent to the ECG service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcgImage {
    data_url: String,
}

impl EcgImage {
    pub fn encode(kind: ImageType, bytes: &[u8]) -> Self {
        Self {
            data_url: format!("data:{};base64,{}", kind.mime(), STANDARD.encode(bytes)),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// Validate and encode off the async executor.
pub async fn read_as_data_url(file: SelectedFile) -> Result<EcgImage, UploadError> {
    let kind = validate(&file)?;
    let name = file.name.clone();
    let image = tokio::task::spawn_blocking(move || EcgImage::encode(kind, &file.bytes))
        .await
        .map_err(|err| UploadError::Read {
            name: name.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, err),
        })?;
    debug!(file = %name, encoded = image.data_url.len(), "Image read as data URL");
    Ok(image)
}
