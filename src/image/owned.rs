use crate::image::ImageView;
use crate::util::{BandMatchError, BandMatchResult};

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer whose length is exactly `width * height`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> BandMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(BandMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(BandMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(BandMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(BandMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> BandMatchResult<Self> {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for y in 0..view.height() {
            let row = view.row(y).ok_or(BandMatchError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, view.width(), view.height())
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the whole image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}
