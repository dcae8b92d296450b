//! Codec glue between the pixel buffers and the `image` crate.
//!
//! Decoding accepts anything the enabled codecs understand (PNG, JPEG) and
//! hands back a `DynamicImage`; each buffer type normalises it into its own
//! channel layout. Encoding always writes an 8-bit, non-interlaced PNG.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};

/// Errors raised while loading or saving a pixel buffer.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Could not open file {} for reading: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open file {} for writing: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error while decoding {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Error during png creation for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image dimensions {width}x{height} exceed the PNG limit")]
    TooLarge { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, BufferError>;

/// Open and decode an image file.
pub(crate) fn decode(path: &Path) -> Result<DynamicImage> {
    let file = File::open(path).map_err(|source| BufferError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| BufferError::Decode {
            path: path.to_path_buf(),
            source,
        })
        .inspect(|img| {
            log::debug!(
                "Decoded {} ({}x{}, {:?})",
                path.display(),
                img.width(),
                img.height(),
                img.color()
            )
        })
}

/// Encode raw 8-bit samples as a PNG file.
///
/// `bytes` must hold exactly `width * height` samples of `color`.
pub(crate) fn encode_png(
    path: &Path,
    bytes: &[u8],
    width: usize,
    height: usize,
    color: ExtendedColorType,
) -> Result<()> {
    let dims = u32::try_from(width).ok().zip(u32::try_from(height).ok());
    let Some((w, h)) = dims else {
        return Err(BufferError::TooLarge { width, height });
    };

    // Nothing touches the filesystem until encoding succeeds.
    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded)
        .write_image(bytes, w, h, color)
        .map_err(|source| BufferError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

    let mut file = File::create(path).map_err(|source| BufferError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    if let Err(source) = file.write_all(&encoded).and_then(|()| file.flush()) {
        drop(file);
        let _ = std::fs::remove_file(path);
        return Err(BufferError::Encode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(source),
        });
    }

    log::debug!("Wrote {} ({}x{}, {:?})", path.display(), w, h, color);
    Ok(())
}

/// Log a failed load/save as a diagnostic and pass the result through.
pub(crate) fn report<T>(result: Result<T>) -> Result<T> {
    result.inspect_err(|e| log::error!("{e}"))
}
