//! Read-only collision surface that agents sense and crash against.
//!
//! A track is classified once at load time into border / free cells; after that
//! every query is a bounds check plus a lookup.

use std::path::Path;

use macroquad::texture::Image;
use ndarray::Array2;

use super::error::TrackError;
use super::params::Params;

/// Classification of a single world coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Track border: agents crash here and rays stop here.
    Border,
    /// Drivable surface.
    Free,
    /// Outside the surface.
    OutOfBounds,
}

/// Anything that can classify integer world coordinates.
///
/// Implemented by [`TrackMask`] and by procedural or synthetic surfaces in tests.
pub trait Classifier: Sync {
    /// Classifies the pixel at `(x, y)`.
    fn classify(&self, x: i32, y: i32) -> Cell;
}

/// Binary border mask indexed as `[y, x]`.
#[derive(Debug, Clone)]
pub struct TrackMask {
    border: Array2<bool>,
}

impl TrackMask {
    /// Builds a mask from a predicate called once per pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        is_border: impl Fn(usize, usize) -> bool,
    ) -> Result<Self, TrackError> {
        if width == 0 || height == 0 {
            return Err(TrackError::Empty { width, height });
        }
        let border = Array2::from_shape_fn((height, width), |(y, x)| is_border(x, y));
        Ok(Self { border })
    }

    /// Builds a mask from an RGBA8 buffer by exact RGB match against `border_color`.
    pub fn from_rgba8(
        width: usize,
        height: usize,
        bytes: &[u8],
        border_color: [u8; 3],
    ) -> Result<Self, TrackError> {
        Self::from_rgba8_scaled(width, height, bytes, border_color, width, height)
    }

    /// Like [`TrackMask::from_rgba8`], resampling the image to `target_width` x
    /// `target_height` with nearest-neighbour lookup.
    pub fn from_rgba8_scaled(
        width: usize,
        height: usize,
        bytes: &[u8],
        border_color: [u8; 3],
        target_width: usize,
        target_height: usize,
    ) -> Result<Self, TrackError> {
        if width == 0 || height == 0 {
            return Err(TrackError::Empty { width, height });
        }
        let expected = width * height * 4;
        if bytes.len() < expected {
            return Err(TrackError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }

        Self::from_fn(target_width, target_height, |x, y| {
            let src_x = x * width / target_width;
            let src_y = y * height / target_height;
            let offset = (src_y * width + src_x) * 4;
            bytes[offset..offset + 3] == border_color
        })
    }

    /// Decodes a PNG track and scales it to the world size in `params`.
    pub fn load_png(path: impl AsRef<Path>, params: &Params) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mask = Self::from_image(&decode_png(&data)?, params)?;
        tracing::debug!(
            path = %path.display(),
            border_pixels = mask.border_count(),
            "loaded track mask"
        );
        Ok(mask)
    }

    /// Classifies a decoded image, scaled to the world size in `params`.
    pub fn from_image(image: &Image, params: &Params) -> Result<Self, TrackError> {
        Self::from_rgba8_scaled(
            usize::from(image.width),
            usize::from(image.height),
            &image.bytes,
            params.border_color,
            params.world_width as usize,
            params.world_height as usize,
        )
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.border.ncols()
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.border.nrows()
    }

    /// Number of border pixels.
    pub fn border_count(&self) -> usize {
        self.border.iter().filter(|&&b| b).count()
    }
}

impl Classifier for TrackMask {
    #[inline]
    fn classify(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 {
            return Cell::OutOfBounds;
        }
        match self.border.get((y as usize, x as usize)) {
            Some(true) => Cell::Border,
            Some(false) => Cell::Free,
            None => Cell::OutOfBounds,
        }
    }
}

/// Decodes PNG bytes into an RGBA8 image. The format is sniffed from the header.
pub fn decode_png(data: &[u8]) -> Result<Image, TrackError> {
    Image::from_file_with_format(data, None)
        .map_err(|e| TrackError::Decode(format!("{e:?}")))
}
