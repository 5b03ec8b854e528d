// routes/qrcode.rs
// Renders the otpauth URL as a base64 PNG QR code for the enrollment response.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use crate::error::AppError;

pub fn qr_png_base64(url: &str) -> Result<String, AppError> {
    let code = QrCode::new(url.as_bytes()).map_err(|_| AppError::QrCode)?;
    let img = code.render::<Luma<u8>>().min_dimensions(200, 200).build();

    // image 0.25: write_to requires Write + Seek -> Cursor<Vec<u8>>
    let mut cursor = Cursor::new(Vec::<u8>::new());
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|_| AppError::QrCode)?;
    Ok(STANDARD.encode(cursor.into_inner()))
}
