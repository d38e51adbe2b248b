/* Copyright 2020 @TwoCookingMice */

use std::fmt;
use std::fs::File;

use image::ImageEncoder;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};

use crate::math::bitmap::Bitmap;

#[derive(Debug)]
pub enum PpmWriteError {
    Io(std::io::Error),
    Encode(image::ImageError),
}

impl From<std::io::Error> for PpmWriteError {
    fn from(err: std::io::Error) -> Self {
        PpmWriteError::Io(err)
    }
}

impl From<image::ImageError> for PpmWriteError {
    fn from(err: image::ImageError) -> Self {
        PpmWriteError::Encode(err)
    }
}

impl fmt::Display for PpmWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PpmWriteError::Io(err) => write!(f, "io error: {}", err),
            PpmWriteError::Encode(err) => write!(f, "encode error: {}", err),
        }
    }
}

impl std::error::Error for PpmWriteError {}

// Write the bitmap as a binary 8-bit PPM. The caller is expected to have
// averaged and gamma-corrected the image already.
pub fn write_ppm_to_file(image: &Bitmap, file_path: &str)
    -> Result<(), PpmWriteError> {
    log::info!("Writing PPM image to: {}.", file_path);

    let width = image.width();
    let height = image.height();
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let pixel = image[(x, y)];
            for channel in 0..3 {
                let value = pixel[channel].clamp(0.0, 1.0);
                data.push((255.0 * value) as u8);
            }
        }
    }

    let mut file = File::create(file_path)?;
    let encoder = PnmEncoder::new(&mut file)
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary));
    encoder.write_image(&data, width as u32, height as u32,
                        image::ColorType::Rgb8)?;

    log::info!("PPM image written, width = {}, height = {}.", width, height);
    Ok(())
}
