// Core types shared by drawing, particles and the page.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame filled with one color.
    pub fn new(width: usize, height: usize, color: Rgb) -> Self {
        Self { width, height, pixels: vec![color.packed(); width * height] }
    }

    /// Reallocate to a new size; contents are reset to `color`.
    /// Visual: the next presented frame matches the new window size.
    pub fn resize(&mut self, width: usize, height: usize, color: Rgb) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, color.packed());
    }

    pub fn fill(&mut self, color: Rgb) {
        let c = color.packed();
        for p in &mut self.pixels { *p = c; }
    }
}

/// Plain 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Pack as 0x00RRGGBB.
    #[inline]
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub const fn unpack(px: u32) -> Self {
        Self { r: ((px >> 16) & 0xFF) as u8, g: ((px >> 8) & 0xFF) as u8, b: (px & 0xFF) as u8 }
    }
}

/// Axis-aligned rectangle in window pixels, used for hit-testing buttons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x as f32
            && py >= self.y as f32
            && px < (self.x + self.w) as f32
            && py < (self.y + self.h) as f32
    }
}
