//! Window icon loading.

use std::path::{Path, PathBuf};

use winit::window::{BadIcon, Icon};

#[derive(thiserror::Error, Debug)]
pub enum IconError {
    #[error("failed to decode icon image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image is not a valid window icon: {0}")]
    Invalid(#[from] BadIcon),
}

/// Flag icon compiled into the binary.
pub const DEFAULT_ICON_PNG: &[u8] = include_bytes!("../../assets/americanflag.png");

/// Where the window icon comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum IconSource {
    /// Encoded image bytes (PNG).
    Embedded(&'static [u8]),
    /// Image file, resolved against the working directory.
    File(PathBuf),
}

impl Default for IconSource {
    fn default() -> Self {
        IconSource::Embedded(DEFAULT_ICON_PNG)
    }
}

impl IconSource {
    pub fn load(&self) -> Result<Icon, IconError> {
        match self {
            IconSource::Embedded(bytes) => icon_from_bytes(bytes),
            IconSource::File(path) => load_icon(path),
        }
    }
}

impl std::fmt::Display for IconSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconSource::Embedded(bytes) => write!(f, "embedded image ({} bytes)", bytes.len()),
            IconSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Decode an encoded image (PNG) from memory into a window icon.
pub fn icon_from_bytes(bytes: &[u8]) -> Result<Icon, IconError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Icon::from_rgba(rgba.into_raw(), width, height)?)
}

/// Load a window icon from disk.
pub fn load_icon(path: impl AsRef<Path>) -> Result<Icon, IconError> {
    let path = path.as_ref();
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("icon: loaded {width}x{height} from {}", path.display());
    Ok(Icon::from_rgba(rgba.into_raw(), width, height)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes() {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([200, 0, 0, 255]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        assert!(icon_from_bytes(&png).is_ok());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = icon_from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, IconError::Decode(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_icon("no/such/dir/americanflag.png").is_err());
        let source = IconSource::File(PathBuf::from("no/such/dir/americanflag.png"));
        assert!(source.load().is_err());
    }

    #[test]
    fn default_icon_is_embedded_and_decodes() {
        let source = IconSource::default();
        assert_eq!(source, IconSource::Embedded(DEFAULT_ICON_PNG));
        assert!(source.load().is_ok());
    }
}
