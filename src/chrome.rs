// Navigation and scroll chrome: purely presentational state.
// Visual outcomes:
// - The navbar turns solid once you scroll past a few pixels.
// - The menu button opens an overlay with the section links; picking one closes it.
// - The nav link for the section you're looking at is highlighted.
// - Panels fade in the first time they scroll into view and stay shown.

/// A vertical band of the page, in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub top: f32,
    pub height: f32,
}

impl Band {
    /// Share of this band inside the viewport `[scroll_y, scroll_y + viewport_h)`.
    pub fn visible_ratio(&self, scroll_y: f32, viewport_h: f32) -> f32 {
        if self.height <= 0.0 { return 0.0; }
        let top = self.top.max(scroll_y);
        let bottom = (self.top + self.height).min(scroll_y + viewport_h);
        ((bottom - top) / self.height).clamp(0.0, 1.0)
    }
}

const ACTIVE_SECTION_RATIO: f32 = 0.3;

#[derive(Debug)]
pub struct NavChrome {
    scroll_threshold: f32,
    scrolled: bool,
    menu_open: bool,
    active: Option<usize>,
}

impl NavChrome {
    pub fn new(scroll_threshold: f32) -> Self {
        Self { scroll_threshold, scrolled: false, menu_open: false, active: None }
    }

    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.scrolled = scroll_y > self.scroll_threshold;
    }

    pub fn is_scrolled(&self) -> bool { self.scrolled }

    pub fn is_menu_open(&self) -> bool { self.menu_open }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn open_menu(&mut self) { self.menu_open = true; }

    pub fn close_menu(&mut self) { self.menu_open = false; }

    /// Highlight the first section with enough of itself on screen.
    /// Keeps the previous highlight when none qualifies.
    pub fn update_active(&mut self, sections: &[Band], scroll_y: f32, viewport_h: f32) {
        if let Some(i) = sections
            .iter()
            .position(|s| s.visible_ratio(scroll_y, viewport_h) >= ACTIVE_SECTION_RATIO)
        {
            self.active = Some(i);
        }
    }

    pub fn active(&self) -> Option<usize> { self.active }

    /// A menu link was chosen: close the menu and return where to scroll.
    pub fn select(&mut self, section: &Band, navbar_height: f32) -> f32 {
        self.close_menu();
        scroll_target(section, navbar_height)
    }
}

/// Scroll offset that puts `section` just below the navbar.
pub fn scroll_target(section: &Band, navbar_height: f32) -> f32 {
    (section.top - navbar_height).max(0.0)
}

/// One-shot reveal flags, one per tracked element.
#[derive(Debug)]
pub struct Reveal {
    threshold: f32,
    shown: Vec<bool>,
}

impl Reveal {
    pub fn new(count: usize, threshold: f32) -> Self {
        Self { threshold, shown: vec![false; count] }
    }

    /// Mark newly visible elements. Once shown, always shown.
    pub fn update(&mut self, bands: &[Band], scroll_y: f32, viewport_h: f32) {
        for (shown, band) in self.shown.iter_mut().zip(bands) {
            if !*shown && band.visible_ratio(scroll_y, viewport_h) >= self.threshold {
                *shown = true;
            }
        }
    }

    pub fn is_shown(&self, index: usize) -> bool {
        self.shown.get(index).copied().unwrap_or(true)
    }
}
