use std::path::Path;

use chroma_flux::Bitmap;
use image::{Rgb, RgbImage};

pub fn load_bitmap<P: AsRef<Path>>(path: P) -> anyhow::Result<Bitmap> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();

    let pixels = img.pixels().map(|p| p.0).collect();

    Ok(Bitmap::new(w as usize, h as usize, pixels)?)
}

pub fn to_image(bitmap: &Bitmap) -> RgbImage {
    let mut img = RgbImage::new(bitmap.width() as u32, bitmap.height() as u32);

    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            img.put_pixel(x as u32, y as u32, Rgb(bitmap.get((x, y))));
        }
    }

    img
}

pub fn save_frame(dir: &Path, prefix: &str, index: usize, bitmap: &Bitmap) -> anyhow::Result<()> {
    to_image(bitmap).save(dir.join(format!("{}_{:06}.png", prefix, index)))?;

    Ok(())
}
