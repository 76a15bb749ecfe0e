//! In-memory image buffers and PNG encoding.

use std::io::Cursor;

use framedrop_core::UploadError;

/// Fixed filename for payloads produced from an image tensor.
pub const IMAGE_FILENAME: &str = "image.png";

/// Image buffer as the host supplies it: a `[height, width, channels]`
/// grid of `f32` values normalized to `[0, 1]`, optionally with a leading
/// batch axis.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
    shape: Vec<usize>,
}

impl ImageTensor {
    /// Validate shape and element count up front so the encoding path only
    /// deals with well-formed grids.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, UploadError> {
        if shape.len() != 3 && shape.len() != 4 {
            return Err(UploadError::UnsupportedInput(format!(
                "expected [h, w, c] or [b, h, w, c] image tensor, got shape {:?}",
                shape
            )));
        }
        let channels = shape[shape.len() - 1];
        if !matches!(channels, 1 | 3 | 4) {
            return Err(UploadError::UnsupportedInput(format!(
                "unsupported channel count {} in shape {:?}",
                channels, shape
            )));
        }
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(UploadError::UnsupportedInput(format!(
                "tensor holds {} values but shape {:?} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Self { data, shape })
    }

    fn batched(&self) -> bool {
        self.shape.len() == 4
    }

    pub fn height(&self) -> usize {
        self.shape[self.shape.len() - 3]
    }

    pub fn width(&self) -> usize {
        self.shape[self.shape.len() - 2]
    }

    pub fn channels(&self) -> usize {
        self.shape[self.shape.len() - 1]
    }

    /// Encode as PNG. A batch axis drops to its first element; values are
    /// scaled by 255, rounded, and clamped into u8 range per channel.
    pub fn to_png(&self) -> Result<Vec<u8>, UploadError> {
        let frame_len = self.height() * self.width() * self.channels();
        if frame_len == 0 || (self.batched() && self.shape[0] == 0) {
            return Err(UploadError::UnsupportedInput(format!(
                "empty image tensor with shape {:?}",
                self.shape
            )));
        }
        let frame = &self.data[..frame_len];
        let pixels: Vec<u8> = frame
            .iter()
            .map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect();

        let (width, height) = (self.width() as u32, self.height() as u32);
        let img = match self.channels() {
            1 => image::GrayImage::from_raw(width, height, pixels)
                .map(image::DynamicImage::ImageLuma8),
            3 => {
                image::RgbImage::from_raw(width, height, pixels).map(image::DynamicImage::ImageRgb8)
            }
            4 => image::RgbaImage::from_raw(width, height, pixels)
                .map(image::DynamicImage::ImageRgba8),
            _ => unreachable!("channel count validated in new()"),
        }
        .ok_or_else(|| {
            UploadError::ImageEncoding(format!(
                "pixel buffer does not fit {}x{} frame",
                width, height
            ))
        })?;

        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| UploadError::ImageEncoding(e.to_string()))?;
        Ok(out.into_inner())
    }
}
