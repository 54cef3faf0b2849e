// The landing page as one piece of state: particles behind, page on top.
// main.rs feeds it window input once per frame; it never touches the window itself.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, info, warn};

use crate::chrome::{NavChrome, Reveal, scroll_target};
use crate::config::Config;
use crate::countdown::{Countdown, parse_target};
use crate::draw::{Canvas, Surface};
use crate::error::Error;
use crate::form::{FieldError, FormState, NotifyForm, Submission};
use crate::i18n::{Element, I18n, Translations};
use crate::page::{self, Hit, Layout, PageView, NAVBAR_H};
use crate::particles::ParticleField;
use crate::snapshot;
use crate::storage::KeyValueStore;
use crate::debounce::Debouncer;
use crate::types::{FrameBuffer, Rgb};

/// Pixels scrolled per wheel notch.
const SCROLL_STEP: f32 = 40.0;

pub struct Landing<S: KeyValueStore> {
    store: S,
    i18n: I18n,
    elements: Vec<Element>,
    countdown: Countdown,
    form: NotifyForm,
    nav: NavChrome,
    reveal: Reveal,
    field: Option<ParticleField>,
    surface: Surface,
    resize: Debouncer,
    scroll_y: f32,
    user_paused: bool,
    hidden: bool,
}

impl<S: KeyValueStore> Landing<S> {
    /// Restore the saved language, translate the page, and scatter the particles.
    pub fn new(
        config: &Config,
        store: S,
        translations: Translations,
        size: (usize, usize),
        field: Option<ParticleField>,
    ) -> Result<Self, Error> {
        let i18n = I18n::restore(translations, &store, &config.i18n.storage_key, &config.i18n.default_lang);
        let mut elements = page::page_elements();
        i18n.apply(&mut elements);

        let [r, g, b] = config.window.background;
        let mut landing = Self {
            store,
            i18n,
            elements,
            countdown: Countdown::new(parse_target(&config.page.launch_at)?),
            form: NotifyForm::new(&config.storage.submissions_key),
            nav: NavChrome::new(config.page.scroll_threshold),
            reveal: Reveal::new(2, config.page.reveal_threshold),
            field,
            surface: Surface::new(size.0, size.1, Rgb::new(r, g, b)),
            resize: Debouncer::new(Duration::from_millis(config.page.resize_debounce_ms)),
            scroll_y: 0.0,
            user_paused: false,
            hidden: false,
        };
        landing.scroll_to(0.0);
        Ok(landing)
    }

    pub fn layout(&self) -> Layout {
        let langs: Vec<&str> = self.i18n.languages().collect();
        let (w, h) = self.surface.size();
        Layout::compute(w, h, self.scroll_y, &langs)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.surface.frame
    }

    pub fn i18n(&self) -> &I18n { &self.i18n }

    pub fn elements(&self) -> &[Element] { &self.elements }

    pub fn form(&self) -> &NotifyForm { &self.form }

    pub fn nav(&self) -> &NavChrome { &self.nav }

    pub fn store(&self) -> &S { &self.store }

    pub fn field(&self) -> Option<&ParticleField> { self.field.as_ref() }

    pub fn scroll_y(&self) -> f32 { self.scroll_y }

    /* ---------- window events ---------- */

    /// The window reports its size every frame. The frame buffer follows at once;
    /// particles regenerate only after the size has been stable for the debounce period.
    pub fn on_window_size(&mut self, size: (usize, usize), now: Instant) {
        if size != self.surface.size() {
            self.surface.resize(size.0, size.1);
            self.resize.trigger(now);
            self.scroll_to(self.scroll_y);
        }
        if self.resize.poll(now) {
            if let Some(field) = self.field.as_mut() {
                field.resize(size.0, size.1);
                debug!(width = size.0, height = size.1, "particles regenerated");
            }
        }
    }

    /// Pointer over the window, or None when it left.
    pub fn on_pointer(&mut self, pos: Option<(f32, f32)>) {
        if let Some(field) = self.field.as_mut() {
            match pos {
                Some((x, y)) => field.pointer_move(x, y),
                None => field.pointer_leave(),
            }
        }
    }

    pub fn on_wheel(&mut self, notches: f32) {
        if notches != 0.0 {
            self.scroll_to(self.scroll_y + notches * SCROLL_STEP);
        }
    }

    pub fn scroll_to(&mut self, y: f32) {
        let layout = self.layout();
        self.scroll_y = y.clamp(0.0, layout.max_scroll());
        let vh = layout.height as f32;
        self.nav.on_scroll(self.scroll_y);
        self.nav.update_active(&layout.sections, self.scroll_y, vh);
        self.reveal.update(&layout.panels, self.scroll_y, vh);
    }

    pub fn on_click(&mut self, x: f32, y: f32, now: SystemTime) {
        let layout = self.layout();
        let editing = self.form.state() == FormState::Editing;
        let Some(hit) = layout.hit(x, y, self.nav.is_menu_open(), editing) else { return };
        debug!(?hit, "click");
        match hit {
            Hit::Lang(lang) => {
                if !self.i18n.is_active(&lang) {
                    self.set_language(&lang);
                }
            }
            Hit::MenuButton => self.nav.toggle_menu(),
            Hit::MenuOverlay => self.nav.close_menu(),
            Hit::MenuLink(i) => {
                let target = self.nav.select(&layout.sections[i], NAVBAR_H as f32);
                self.scroll_to(target);
            }
            Hit::NavLink(i) => self.scroll_to(scroll_target(&layout.sections[i], NAVBAR_H as f32)),
            Hit::Field(i) => self.form.focus_field(i),
            Hit::Submit => {
                let _ = self.submit(now);
            }
        }
    }

    /// Text typed while the form is showing.
    pub fn on_chars(&mut self, chars: &[char]) {
        if self.nav.is_menu_open() { return; }
        for &ch in chars {
            self.form.type_char(ch);
        }
    }

    pub fn on_tab(&mut self) { self.form.focus_next(); }

    pub fn on_backspace(&mut self) { self.form.backspace(); }

    pub fn on_enter(&mut self, now: SystemTime) {
        if self.form.state() == FormState::Editing && !self.nav.is_menu_open() {
            let _ = self.submit(now);
        }
    }

    /* ---------- features ---------- */

    /// Switch language and retranslate the page. Unsupported codes change nothing.
    pub fn set_language(&mut self, lang: &str) -> bool {
        let changed = self.i18n.set_language(lang, &mut self.store);
        if changed {
            self.i18n.apply(&mut self.elements);
        }
        changed
    }

    pub fn submit(&mut self, now: SystemTime) -> Result<Submission, FieldError> {
        let lang = self.i18n.current().to_owned();
        let result = self.form.submit(&mut self.store, &lang, now);
        if let Err(e) = &result {
            info!(error = %e, "form not submitted");
        }
        result
    }

    /// Window focus lost / regained ("page hidden").
    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden != self.hidden {
            self.hidden = hidden;
            self.apply_pause();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.user_paused = !self.user_paused;
        info!(paused = self.user_paused, "animation pause toggled");
        self.apply_pause();
    }

    fn apply_pause(&mut self) {
        if let Some(field) = self.field.as_mut() {
            if self.user_paused || self.hidden { field.pause() } else { field.resume() }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.field.as_ref().is_some_and(|f| !f.is_running())
    }

    /// Produce the next frame: particles (advanced only while running), then the page.
    pub fn render(&mut self, now: SystemTime, hud: &str) {
        self.countdown.refresh(now);

        match self.field.as_mut() {
            Some(field) => {
                if !field.frame(&mut self.surface) {
                    field.render(&mut self.surface); // paused: same particles, fresh page
                }
            }
            None => self.surface.clear(),
        }

        let layout = self.layout();
        let view = PageView {
            elements: &self.elements,
            countdown: self.countdown.slots(),
            form: &self.form,
            active_lang: self.i18n.current(),
            scrolled: self.nav.is_scrolled(),
            menu_open: self.nav.is_menu_open(),
            active_section: self.nav.active(),
            panel_shown: [self.reveal.is_shown(0), self.reveal.is_shown(1)],
            paused: self.is_paused(),
            hud,
        };
        page::draw_page(&mut self.surface, &layout, &view);
    }

    pub fn snapshot(&self, dir: &Path, now: SystemTime) -> Option<PathBuf> {
        match snapshot::save_png(&self.surface.frame, dir, now) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "snapshot failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::stored_submissions;
    use crate::particles::FieldConfig;
    use crate::storage::MemoryStore;
    use crate::types::Rect;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const SIZE: (usize, usize) = (1000, 800);

    fn landing(store: MemoryStore) -> Landing<MemoryStore> {
        let config = Config::default();
        let t = Translations::from_json_str(include_str!("../data/translations.json")).unwrap();
        let field = ParticleField::initialize_with_rng(
            Some(SIZE),
            FieldConfig { particle_count: 10, ..FieldConfig::default() },
            SmallRng::seed_from_u64(1),
        );
        Landing::new(&config, store, t, SIZE, field).unwrap()
    }

    fn center(r: Rect) -> (f32, f32) {
        ((r.x + r.w / 2) as f32, (r.y + r.h / 2) as f32)
    }

    #[test]
    fn starts_in_default_language_translated() {
        let l = landing(MemoryStore::default());
        assert_eq!(l.i18n().current(), "es");
        assert_eq!(l.elements()[page::DAYS].text, "Días");
    }

    #[test]
    fn clicking_a_language_button_retranslates_and_persists() {
        let mut l = landing(MemoryStore::default());
        let layout = l.layout();
        let (_, r) = layout.lang_buttons.iter().find(|(lang, _)| lang == "en").unwrap().clone();
        let (x, y) = center(r);
        l.on_click(x, y, SystemTime::now());

        assert_eq!(l.i18n().current(), "en");
        assert_eq!(l.elements()[page::DAYS].text, "Days");
        assert_eq!(l.store().get("orbe-lang").as_deref(), Some("en"));

        assert!(!l.set_language("xx"));
        assert_eq!(l.elements()[page::DAYS].text, "Days");
        assert_eq!(l.store().get("orbe-lang").as_deref(), Some("en"));
    }

    #[test]
    fn typed_form_submits_on_enter() {
        let mut l = landing(MemoryStore::default());
        l.on_chars(&"a@b.com".chars().collect::<Vec<_>>());
        l.on_tab();
        l.on_chars(&['X']);
        l.on_enter(SystemTime::now());

        assert_eq!(l.form().state(), FormState::Submitted);
        let stored = stored_submissions(l.store(), "orbe-submissions");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["email"], "a@b.com");
        assert_eq!(stored[0]["organization"], "X");
        assert_eq!(stored[0]["lang"], "es");

        // success state swallows further input
        l.on_enter(SystemTime::now());
        assert_eq!(stored_submissions(l.store(), "orbe-submissions").len(), 1);
    }

    #[test]
    fn menu_link_scrolls_and_closes_menu() {
        let mut l = landing(MemoryStore::default());
        let (x, y) = center(l.layout().menu_button);
        l.on_click(x, y, SystemTime::now());
        assert!(l.nav().is_menu_open());

        let (x, y) = center(l.layout().menu_links[1]);
        l.on_click(x, y, SystemTime::now());
        assert!(!l.nav().is_menu_open());
        assert_eq!(l.scroll_y(), 800.0 - NAVBAR_H as f32);
        assert!(l.nav().is_scrolled());
        assert_eq!(l.nav().active(), Some(1));
    }

    #[test]
    fn wheel_scroll_is_clamped() {
        let mut l = landing(MemoryStore::default());
        l.on_wheel(-3.0);
        assert_eq!(l.scroll_y(), 0.0);
        l.on_wheel(1000.0);
        assert_eq!(l.scroll_y(), 800.0);
    }

    #[test]
    fn resize_regenerates_once_after_quiet_period() {
        let mut l = landing(MemoryStore::default());
        let t0 = Instant::now();
        let before = l.field().unwrap().particles().to_vec();

        l.on_window_size((600, 400), t0);
        assert_eq!(l.frame_buffer().pixels.len(), 600 * 400);
        assert_eq!(l.field().unwrap().particles(), &before[..]);

        l.on_window_size((600, 400), t0 + Duration::from_millis(300));
        let field = l.field().unwrap();
        assert_eq!(field.size(), (600.0, 400.0));
        assert_eq!(field.particles().len(), 10);
        assert!(field.particles().iter().all(|p| p.x < 600.0 && p.y < 400.0));
    }

    #[test]
    fn hidden_window_pauses_until_visible_and_unpaused() {
        let mut l = landing(MemoryStore::default());
        l.set_hidden(true);
        assert!(l.is_paused());
        let frozen = l.field().unwrap().particles().to_vec();
        for _ in 0..5 {
            l.render(SystemTime::now(), "");
        }
        assert_eq!(l.field().unwrap().particles(), &frozen[..]);

        l.toggle_pause();
        l.set_hidden(false);
        assert!(l.is_paused());
        l.toggle_pause();
        assert!(!l.is_paused());
    }

    #[test]
    fn pointer_enter_and_leave_reach_the_field() {
        let mut l = landing(MemoryStore::default());
        l.on_pointer(Some((5.0, 6.0)));
        assert_eq!(l.field().unwrap().pointer(), Some((5.0, 6.0)));
        l.on_pointer(None);
        assert_eq!(l.field().unwrap().pointer(), None);
    }

    #[test]
    fn no_field_still_renders_the_page() {
        let config = Config::default();
        let mut l = Landing::new(&config, MemoryStore::default(), Translations::builtin(), SIZE, None).unwrap();
        l.render(SystemTime::now(), "FPS: 60.0");
        assert!(!l.is_paused());
        assert_eq!(l.frame_buffer().pixels.len(), SIZE.0 * SIZE.1);
    }
}
