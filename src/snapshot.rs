// F12 snapshots: write the frame currently on screen to a PNG.
// Visual: nothing changes in the window; a file appears next to the binary.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use image::{ImageBuffer, Rgb as Px, RgbImage};
use tracing::info;

use crate::error::Error;
use crate::types::{FrameBuffer, Rgb};

/// Unpack 0x00RRGGBB pixels into an RGB image buffer.
pub fn to_rgb_image(fb: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let c = Rgb::unpack(fb.pixels[y as usize * fb.width + x as usize]);
        Px([c.r, c.g, c.b])
    })
}

/// Save `fb` as `orbe-<unix millis>.png` inside `dir`; returns the written path.
pub fn save_png(fb: &FrameBuffer, dir: &Path, now: SystemTime) -> Result<PathBuf, Error> {
    let millis = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let path = dir.join(format!("orbe-{millis}.png"));
    to_rgb_image(fb).save(&path)?;
    info!(path = %path.display(), "snapshot saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_land_in_the_right_place() {
        let mut fb = FrameBuffer::new(3, 2, Rgb::new(0, 0, 0));
        // (x=2, y=1)
        fb.pixels[3 + 2] = Rgb::new(212, 165, 116).packed();
        let img = to_rgb_image(&fb);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1), &Px([212, 165, 116]));
        assert_eq!(img.get_pixel(0, 0), &Px([0, 0, 0]));
    }

    #[test]
    fn save_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let fb = FrameBuffer::new(4, 4, Rgb::new(45, 95, 63));
        let path = save_png(&fb, dir.path(), SystemTime::UNIX_EPOCH).unwrap();
        assert!(path.ends_with("orbe-0.png"));
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.get_pixel(3, 3), &Px([45, 95, 63]));
    }
}
