use image::{ImageBuffer, Luma, Rgba};

use crate::config::PixelRect;

/// Converts an image to binary by keeping only bright pixels.
///
/// Pixels where R, G and B all exceed the threshold become black (text);
/// everything else becomes white (background). This isolates the bright
/// scoreboard text from the darker game UI behind it.
pub fn threshold_bright_pixels(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    threshold: u8,
) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let r = pixel[0];
        let g = pixel[1];
        let b = pixel[2];

        let value = if r > threshold && g > threshold && b > threshold {
            0u8 // text
        } else {
            255u8 // background
        };

        output.put_pixel(x, y, Luma([value]));
    }

    output
}

/// Crops a hand-configured pixel rectangle out of the screenshot, clamped to
/// the image bounds. Used to isolate one player row for fallback OCR.
pub fn crop_rect(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    rect: &PixelRect,
) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    let (w, h) = img.dimensions();

    let x0 = rect.x.min(w);
    let y0 = rect.y.min(h);
    let rw = rect.width.min(w - x0);
    let rh = rect.height.min(h - y0);

    image::imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}
