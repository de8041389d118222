use anyhow::{ensure, Context, Result};
use image::{imageops, RgbaImage};
use log::info;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Reads one RGBA pixel from the bound read framebuffer. `y` counts from
/// the bottom, as in GL.
pub fn read_pixel(x: i32, y: i32) -> [u8; 4] {
    let mut pixel = [0u8; 4];
    unsafe {
        gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
        gl::ReadPixels(
            x,
            y,
            1,
            1,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            pixel.as_mut_ptr().cast(),
        );
    }
    pixel
}

/// Reads the whole framebuffer, top row first.
pub fn read_framebuffer(width: u32, height: u32) -> Result<RgbaImage> {
    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    unsafe {
        gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
        gl::ReadPixels(
            0,
            0,
            width as i32,
            height as i32,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            pixels.as_mut_ptr().cast(),
        );
    }
    image_from_gl_rows(width, height, pixels)
}

/// GL returns rows bottom-up; images are stored top-down.
fn image_from_gl_rows(width: u32, height: u32, pixels: Vec<u8>) -> Result<RgbaImage> {
    let mut image = RgbaImage::from_raw(width, height, pixels)
        .context("Framebuffer data does not match its size")?;
    imageops::flip_vertical_in_place(&mut image);
    Ok(image)
}

pub fn screenshot_file_name(time: SystemTime) -> String {
    let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    format!(
        "screenshot-{}-{:03}.png",
        since_epoch.as_secs(),
        since_epoch.subsec_millis()
    )
}

/// Saves the current framebuffer as a PNG in `dir` and returns its path.
pub fn save_screenshot(dir: &Path, width: u32, height: u32) -> Result<PathBuf> {
    ensure!(width > 0 && height > 0, "Nothing to capture at {}x{}", width, height);
    let image = read_framebuffer(width, height)?;
    write_png(dir, &image, SystemTime::now())
}

fn write_png(dir: &Path, image: &RgbaImage, time: SystemTime) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create screenshot directory {:?}", dir))?;
    let path = dir.join(screenshot_file_name(time));
    image
        .save(&path)
        .with_context(|| format!("Failed to write screenshot {:?}", path))?;
    info!("Saved screenshot to {}", path.display());
    Ok(path)
}
