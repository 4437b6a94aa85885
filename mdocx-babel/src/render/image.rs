//! Inline image placement
//!
//! Images are sized from their pixel dimensions at a fixed assumed density and
//! never drawn wider than a fraction of the page width. Height follows the
//! width so the aspect ratio is kept.

use crate::docx::model::Image;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// What to do when an image cannot be read or identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingImagePolicy {
    /// Log a warning and leave the image out.
    #[default]
    Skip,
    /// Abort the conversion.
    Fail,
}

/// Target size of an image, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width_inches: f64,
    pub height_inches: f64,
}

impl Placement {
    /// Fit `width_px` x `height_px` at `ppi` into `max_width_inches`.
    pub fn fit(width_px: usize, height_px: usize, ppi: f64, max_width_inches: f64) -> Placement {
        let natural_width = width_px as f64 / ppi;
        let natural_height = height_px as f64 / ppi;
        if natural_width > max_width_inches {
            Placement {
                width_inches: max_width_inches,
                height_inches: natural_height * (max_width_inches / natural_width),
            }
        } else {
            Placement {
                width_inches: natural_width,
                height_inches: natural_height,
            }
        }
    }
}

/// Turn an `src` attribute into a local path.
///
/// Relative paths resolve against `base_dir`. `file://` URLs are accepted;
/// any other URL scheme is not.
pub fn resolve_source(src: &str, base_dir: &Path) -> Result<PathBuf, String> {
    if let Ok(url) = Url::parse(src) {
        // A single-letter scheme is a Windows drive, not a URL.
        if url.scheme().len() > 1 {
            if url.scheme() != "file" {
                return Err(format!("unsupported URL scheme '{}'", url.scheme()));
            }
            return url
                .to_file_path()
                .map_err(|_| format!("'{src}' is not a local file URL"));
        }
    }
    let path = Path::new(src);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(base_dir.join(path))
    }
}

fn extension_for(kind: imagesize::ImageType) -> Option<&'static str> {
    use imagesize::ImageType;
    match kind {
        ImageType::Png => Some("png"),
        ImageType::Jpeg => Some("jpeg"),
        ImageType::Gif => Some("gif"),
        ImageType::Bmp => Some("bmp"),
        ImageType::Tiff => Some("tiff"),
        _ => None,
    }
}

/// Read and size the image at `path`.
pub fn load_image(path: &Path, ppi: f64, max_width_inches: f64) -> Result<Image, String> {
    let data = fs::read(path).map_err(|err| err.to_string())?;
    let kind = imagesize::image_type(&data).map_err(|err| err.to_string())?;
    let extension = extension_for(kind)
        .ok_or_else(|| format!("image format {kind:?} cannot be embedded"))?;
    let size = imagesize::blob_size(&data).map_err(|err| err.to_string())?;
    if size.width == 0 || size.height == 0 {
        return Err("image has no pixels".to_string());
    }
    let placement = Placement::fit(size.width, size.height, ppi, max_width_inches);
    Ok(Image {
        source: path.to_path_buf(),
        extension: extension.to_string(),
        width_inches: placement.width_inches,
        height_inches: placement.height_inches,
        data,
    })
}
