// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window that shows the landing page.
// 2) Anti-aliased translucent discs and 1-pixel lines (particles and links).
// 3) A tiny 5x7 bitmap font, scaled up for headings, for every piece of text.

use std::cell::RefCell;
use std::rc::Rc;

use minifb::{InputCallback, Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::gamma::GammaLut;
use crate::types::{FrameBuffer, Rect, Rgb};

/// Collects typed characters from the OS between frames.
struct CharSink(Rc<RefCell<Vec<char>>>);

impl InputCallback for CharSink {
    fn add_char(&mut self, uni_char: u32) {
        if let Some(ch) = char::from_u32(uni_char) {
            if !ch.is_control() {
                self.0.borrow_mut().push(ch);
            }
        }
    }
}

pub struct Drawer {
    window: Window, // the on-screen window you see
    typed: Rc<RefCell<Vec<char>>>,
    left_was_down: bool,
}

impl Drawer {
    /// Create a resizable window paced at `target_fps`.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);

        let typed = Rc::new(RefCell::new(Vec::new()));
        window.set_input_callback(Box::new(CharSink(typed.clone())));

        Ok(Self { window, typed, left_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client-area size; changes when the user resizes the window.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// False while another window has focus (our "page hidden").
    pub fn is_active(&mut self) -> bool {
        self.window.is_active()
    }

    /// Pointer position in window pixels, or None once it leaves the window.
    pub fn pointer_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    /// Vertical wheel movement since the last frame (positive = scroll down).
    pub fn scroll_delta(&self) -> f32 {
        self.window.get_scroll_wheel().map(|(_, dy)| -dy).unwrap_or(0.0)
    }

    /// Position of a left click that started this frame.
    pub fn left_clicked(&mut self) -> Option<(f32, f32)> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = down && !self.left_was_down;
        self.left_was_down = down;
        if clicked { self.pointer_pos() } else { None }
    }

    /// Characters typed since the last call.
    pub fn take_typed(&self) -> Vec<char> {
        std::mem::take(&mut *self.typed.borrow_mut())
    }

    pub fn tab_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::Tab, KeyRepeat::No) }

    pub fn enter_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Enter, KeyRepeat::No)
            || self.window.is_key_pressed(Key::NumPadEnter, KeyRepeat::No)
    }

    // repeats while held, like a text box
    pub fn backspace_pressed(&self) -> bool { self.window.is_key_pressed(Key::Backspace, KeyRepeat::Yes) }

    pub fn pause_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::Pause, KeyRepeat::No) }

    pub fn snapshot_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::F12, KeyRepeat::No) }
}

/* ---------- Canvas: what the particle field draws onto ---------- */

/// Minimal 2D drawing surface. Colors are sRGB, `alpha` in [0,1].
pub trait Canvas {
    fn size(&self) -> (usize, usize);
    fn clear(&mut self);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32);
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb, alpha: f32);
}

/// The window's backing frame plus everything needed to composite onto it.
pub struct Surface {
    pub frame: FrameBuffer,
    background: Rgb,
    lut: GammaLut,
}

impl Surface {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        Self { frame: FrameBuffer::new(width, height, background), background, lut: GammaLut::new() }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.frame.resize(width, height, self.background);
    }

    /// Alpha-composite one pixel if (x,y) is inside bounds.
    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 { return; }
        let (x, y) = (x as usize, y as usize);
        if x >= self.frame.width || y >= self.frame.height { return; }
        let idx = y * self.frame.width + x;
        self.frame.pixels[idx] = self.lut.blend(self.frame.pixels[idx], color, alpha);
    }

    /// Translucent filled rectangle (panels, buttons, the navbar).
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: f32) {
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                self.blend_pixel(x, y, color, alpha);
            }
        }
    }

    /// 1-pixel rectangle outline.
    pub fn stroke_rect(&mut self, rect: Rect, color: Rgb, alpha: f32) {
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.w - 1, rect.y + rect.h - 1);
        draw_line(self, x0, y0, x1, y0, color, alpha);
        draw_line(self, x1, y0, x1, y1, color, alpha);
        draw_line(self, x1, y1, x0, y1, color, alpha);
        draw_line(self, x0, y1, x0, y0, color, alpha);
    }

    /// Draw text with 5x7 glyphs, each glyph pixel blown up to `scale`×`scale`.
    /// Visual: a 1-pixel-per-scale dark shadow keeps text readable over particles.
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Rgb, scale: i32) {
        let mut cx = x;
        for ch in text.chars() {
            if let Some(rows) = glyph5x7(fold_char(ch)) {
                for pass in 0..2 {
                    let (off, c) = if pass == 0 { (scale.max(1), Rgb::new(0, 0, 0)) } else { (0, color) };
                    for (ry, rowbits) in rows.iter().enumerate() {
                        for rx in 0..5 {
                            if (rowbits & (1 << (4 - rx))) != 0 {
                                let px = cx + rx * scale + off;
                                let py = y + ry as i32 * scale + off;
                                self.fill_rect(Rect { x: px, y: py, w: scale, h: scale }, c, 1.0);
                            }
                        }
                    }
                }
            }
            cx += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
        }
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale
}

impl Canvas for Surface {
    fn size(&self) -> (usize, usize) {
        (self.frame.width, self.frame.height)
    }

    fn clear(&mut self) {
        self.frame.fill(self.background);
    }

    /// Coverage falls off over one pixel at the rim, so sub-pixel radii still show.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 || alpha <= 0.0 { return; }
        let reach = radius + 0.5;
        let (x0, x1) = ((cx - reach).floor() as i32, (cx + reach).ceil() as i32);
        let (y0, y1) = ((cy - reach).floor() as i32, (cy + reach).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let coverage = (reach - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(x, y, color, alpha * coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb, alpha: f32) {
        if alpha <= 0.0 { return; }
        draw_line(
            self,
            x0.round() as i32, y0.round() as i32,
            x1.round() as i32, y1.round() as i32,
            color, alpha,
        );
    }
}

/// Draw a thin translucent line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(s: &mut Surface, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb, alpha: f32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        s.blend_pixel(x0, y0, color, alpha);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/* ---------- 5x7 bitmap font ---------- */

/// Map a character onto the font's repertoire: uppercase ASCII, accents dropped.
/// Visual: "Días" renders as "DIAS", "¡Registro" as "!REGISTRO".
pub fn fold_char(ch: char) -> char {
    let base = match ch {
        'á' | 'à' | 'â' | 'ä' | 'Á' | 'À' | 'Â' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' | 'Ñ' => 'N',
        'ç' | 'Ç' => 'C',
        '¡' => '!',
        '¿' => '?',
        other => other,
    };
    base.to_ascii_uppercase()
}

/// Return a 5x7 glyph bitmap.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '@' => g!(0b01110,0b10001,0b10111,0b10101,0b10111,0b10000,0b01110),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '<' => g!(0b00010,0b00100,0b01000,0b10000,0b01000,0b00100,0b00010),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(0, 0, 0);
    const FG: Rgb = Rgb::new(255, 255, 255);

    fn lit(s: &Surface) -> usize {
        s.frame.pixels.iter().filter(|&&p| p != BG.packed()).count()
    }

    #[test]
    fn fold_char_strips_accents_and_uppercases() {
        let folded: String = "Días ¡ñ".chars().map(fold_char).collect();
        assert_eq!(folded, "DIAS !N");
    }

    #[test]
    fn every_folded_translation_letter_has_a_glyph() {
        for ch in "áéíóúñüÁÉÍÓÚÑabcdefghijklmnopqrstuvwxyz0123456789.,:!?@-/'()".chars() {
            assert!(glyph5x7(fold_char(ch)).is_some(), "no glyph for {ch:?}");
        }
    }

    #[test]
    fn transparent_line_draws_nothing() {
        let mut s = Surface::new(20, 20, BG);
        s.stroke_line(0.0, 0.0, 19.0, 19.0, FG, 0.0);
        assert_eq!(lit(&s), 0);
    }

    #[test]
    fn diagonal_line_touches_each_row_once() {
        let mut s = Surface::new(20, 20, BG);
        s.stroke_line(0.0, 0.0, 19.0, 19.0, FG, 1.0);
        assert_eq!(lit(&s), 20);
        assert_eq!(s.frame.pixels[19 * 20 + 19], FG.packed());
    }

    #[test]
    fn circle_is_centered_and_clipped() {
        let mut s = Surface::new(10, 10, BG);
        s.fill_circle(5.0, 5.0, 2.0, FG, 1.0);
        assert_eq!(s.frame.pixels[5 * 10 + 5], FG.packed());
        assert_eq!(s.frame.pixels[0], BG.packed());

        // half outside the frame must not panic
        s.fill_circle(0.0, 0.0, 3.0, FG, 1.0);
        s.fill_circle(100.0, -100.0, 3.0, FG, 1.0);
    }

    #[test]
    fn clear_restores_background() {
        let mut s = Surface::new(8, 8, BG);
        s.fill_rect(Rect { x: 0, y: 0, w: 8, h: 8 }, FG, 1.0);
        s.clear();
        assert_eq!(lit(&s), 0);
    }

    #[test]
    fn text_width_counts_advance() {
        assert_eq!(text_width("ABC", 2), 36);
        let mut s = Surface::new(64, 16, BG);
        s.text(1, 1, "HI", FG, 1);
        assert!(lit(&s) > 0);
    }
}
