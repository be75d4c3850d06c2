use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};

/// Small gradient image encoded in the given format
pub fn create_image(format: ImageFormat) -> Vec<u8> {
    let img = ImageBuffer::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, format)
        .unwrap();
    buffer.into_inner()
}

pub fn create_png() -> Vec<u8> {
    create_image(ImageFormat::Png)
}
