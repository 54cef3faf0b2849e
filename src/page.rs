// Landing page layout and drawing, layered over the particle field.
// Visual, top to bottom:
// - fixed navbar: brand, section links, ES/EN buttons, menu button
// - hero section: status tag, title, subtitle, four countdown boxes, scroll hint
// - contact section: intro, two text boxes + button (or the success line), privacy note, footer
// - optional menu overlay on the right

use crate::chrome::Band;
use crate::draw::{Surface, text_width};
use crate::form::{FieldError, FormState, NotifyForm};
use crate::i18n::Element;
use crate::types::{Rect, Rgb};

pub const NAVBAR_H: i32 = 64;

pub const WHITE: Rgb = Rgb::new(236, 240, 236);
pub const DIM: Rgb = Rgb::new(130, 140, 132);
pub const GREEN: Rgb = Rgb::new(45, 95, 63);
pub const SAND: Rgb = Rgb::new(212, 165, 116);
pub const PANEL: Rgb = Rgb::new(6, 9, 8);
pub const ERROR: Rgb = Rgb::new(220, 90, 80);

/* ---------- translatable page text ---------- */

pub const NAV_HOME: usize = 0;
pub const NAV_CONTACT: usize = 1;
pub const MENU: usize = 2;
pub const STATUS: usize = 3;
pub const TITLE: usize = 4;
pub const SUBTITLE: usize = 5;
pub const SCROLL_HINT: usize = 6;
pub const AVAILABLE: usize = 7;
pub const DAYS: usize = 8;
pub const HOURS: usize = 9;
pub const MINUTES: usize = 10;
pub const SECONDS: usize = 11;
pub const FORM_INTRO: usize = 12;
pub const EMAIL: usize = 13;
pub const ORGANIZATION: usize = 14;
pub const SUBMIT: usize = 15;
pub const SUCCESS: usize = 16;
pub const PRIVACY: usize = 17;
pub const RIGHTS: usize = 18;
pub const ERR_REQUIRED: usize = 19;
pub const ERR_EMAIL: usize = 20;

/// Every piece of page text, with the text shown before any translation applies.
pub fn page_elements() -> Vec<Element> {
    vec![
        Element::text("nav.inicio", "Inicio"),
        Element::text("nav.contacto", "Contacto"),
        Element::text("menu.label", "Menu").with_aria("menu.aria", "Abrir menu"),
        Element::text("hero.status", "EN DESARROLLO"),
        Element::text("hero.title", "Sitio en Construcción"),
        Element::text("hero.subtitle", "Soluciones de Movilidad Táctica para Fuerzas de Defensa"),
        Element::text("hero.scrollText", "Descubre más"),
        Element::text("countdown.available", "Disponible"),
        Element::text("countdown.days", "Días"),
        Element::text("countdown.hours", "Horas"),
        Element::text("countdown.minutes", "Minutos"),
        Element::text("countdown.seconds", "Segundos"),
        Element::text("form.intro", "Sé el primero en conocer nuestro lanzamiento"),
        Element::default()
            .with_placeholder("form.emailPlaceholder", "correo@ejemplo.com")
            .with_aria("form.emailLabel", "Correo"),
        Element::default()
            .with_placeholder("form.orgPlaceholder", "País / Organización")
            .with_aria("form.orgLabel", "Organización"),
        Element::text("form.notify", "Notificarme"),
        Element::text("form.successMessage", "¡Registro exitoso! Te notificaremos pronto."),
        Element::text("form.privacy", "Tu información está protegida. No compartimos datos con terceros."),
        Element::text("footer.rights", "Todos los derechos reservados."),
        Element::text("form.errors.required", "Campo obligatorio"),
        Element::text("form.errors.email", "Correo no válido"),
    ]
}

/// Greedy word wrap to at most `max_chars` per line; long words get their own line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() { line.push(' '); }
        line.push_str(word);
    }
    if !line.is_empty() { lines.push(line); }
    lines
}

/* ---------- layout ---------- */

/// Where everything sits for one frame, in window pixels (already scrolled).
#[derive(Clone, Debug)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub scroll_y: f32,
    pub navbar: Rect,
    pub nav_links: Vec<Rect>,
    pub lang_buttons: Vec<(String, Rect)>,
    pub menu_button: Rect,
    pub menu_panel: Rect,
    pub menu_links: Vec<Rect>,
    pub fields: [Rect; 2],
    pub submit: Rect,
    /// Page-coordinate bands of the two sections.
    pub sections: Vec<Band>,
    /// Page-coordinate bands of the panels that reveal on scroll: countdown, form.
    pub panels: Vec<Band>,
}

impl Layout {
    pub fn compute(width: usize, height: usize, scroll_y: f32, langs: &[&str]) -> Self {
        let (w, h) = (width as i32, height as i32);
        let cx = w / 2;
        let sy = scroll_y.round() as i32;

        let sections = vec![
            Band { top: 0.0, height: h as f32 },
            Band { top: h as f32, height: h as f32 },
        ];
        let nav_links = (0..sections.len() as i32)
            .map(|i| Rect { x: 260 + i * 170, y: 16, w: 150, h: 32 })
            .collect();
        let lang_buttons = langs
            .iter()
            .enumerate()
            .map(|(i, l)| (l.to_string(), Rect { x: w - 220 + i as i32 * 52, y: 16, w: 44, h: 32 }))
            .collect();
        let menu_panel = Rect { x: w - 320, y: NAVBAR_H, w: 320, h: (h - NAVBAR_H).max(0) };
        let menu_links = (0..sections.len() as i32)
            .map(|i| Rect { x: menu_panel.x + 24, y: menu_panel.y + 24 + i * 48, w: 272, h: 36 })
            .collect();

        let form_top = h + (h as f32 * 0.3) as i32;
        let field = |i: i32| Rect { x: cx - 240, y: form_top + 60 + i * 64 - sy, w: 480, h: 44 };

        Self {
            width: w,
            height: h,
            scroll_y,
            navbar: Rect { x: 0, y: 0, w, h: NAVBAR_H },
            nav_links,
            lang_buttons,
            menu_button: Rect { x: w - 100, y: 16, w: 76, h: 32 },
            menu_panel,
            menu_links,
            fields: [field(0), field(1)],
            submit: field(2),
            sections,
            panels: vec![
                Band { top: h as f32 * 0.55, height: 140.0 },
                Band { top: form_top as f32, height: 300.0 },
            ],
        }
    }

    /// Largest scroll offset: the bottom of the last section meets the window bottom.
    pub fn max_scroll(&self) -> f32 {
        self.sections.last().map(|s| s.top + s.height - self.height as f32).unwrap_or(0.0).max(0.0)
    }

    /// Page y -> window y.
    fn y(&self, page_y: f32) -> i32 {
        (page_y - self.scroll_y).round() as i32
    }
}

/// What a click landed on.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
    Lang(String),
    MenuButton,
    MenuLink(usize),
    MenuOverlay,
    NavLink(usize),
    Field(usize),
    Submit,
}

impl Layout {
    /// Topmost interactive thing under (x,y). The open menu swallows clicks outside its links.
    pub fn hit(&self, x: f32, y: f32, menu_open: bool, form_editing: bool) -> Option<Hit> {
        if self.menu_button.contains(x, y) {
            return Some(Hit::MenuButton);
        }
        if let Some((lang, _)) = self.lang_buttons.iter().find(|(_, r)| r.contains(x, y)) {
            return Some(Hit::Lang(lang.clone()));
        }
        if menu_open {
            return Some(match self.menu_links.iter().position(|r| r.contains(x, y)) {
                Some(i) => Hit::MenuLink(i),
                None => Hit::MenuOverlay,
            });
        }
        if let Some(i) = self.nav_links.iter().position(|r| r.contains(x, y)) {
            return Some(Hit::NavLink(i));
        }
        if self.navbar.contains(x, y) || !form_editing {
            return None;
        }
        if let Some(i) = self.fields.iter().position(|r| r.contains(x, y)) {
            return Some(Hit::Field(i));
        }
        self.submit.contains(x, y).then_some(Hit::Submit)
    }
}

/* ---------- drawing ---------- */

/// Read-only view of everything the page shows this frame.
pub struct PageView<'a> {
    pub elements: &'a [Element],
    pub countdown: &'a [String; 4],
    pub form: &'a NotifyForm,
    pub active_lang: &'a str,
    pub scrolled: bool,
    pub menu_open: bool,
    pub active_section: Option<usize>,
    pub panel_shown: [bool; 2],
    pub paused: bool,
    pub hud: &'a str,
}

fn centered(s: &mut Surface, cx: i32, y: i32, text: &str, color: Rgb, scale: i32) {
    s.text(cx - text_width(text, scale) / 2, y, text, color, scale);
}

fn max_chars(width: i32, scale: i32) -> usize {
    ((width - 80).max(6 * scale) / (6 * scale)) as usize
}

pub fn draw_page(s: &mut Surface, l: &Layout, v: &PageView<'_>) {
    let elements = v.elements;
    let el = move |i: usize| elements[i].text.as_str();
    let cx = l.width / 2;

    /* 1) Hero section */
    let hero = l.sections[0];
    let mut y = l.y(hero.top + hero.height * 0.18);
    centered(s, cx, y, el(STATUS), SAND, 2);
    y += 40;
    for line in wrap_text(el(TITLE), max_chars(l.width, 4)) {
        centered(s, cx, y, &line, WHITE, 4);
        y += 40;
    }
    y += 8;
    for line in wrap_text(el(SUBTITLE), max_chars(l.width, 2)) {
        centered(s, cx, y, &line, DIM, 2);
        y += 22;
    }

    /* 2) Countdown boxes */
    if v.panel_shown[0] {
        let panel = l.panels[0];
        let top = l.y(panel.top);
        centered(s, cx, top - 28, el(AVAILABLE), DIM, 2);
        let units = [el(DAYS), el(HOURS), el(MINUTES), el(SECONDS)];
        for (i, (value, unit)) in v.countdown.iter().zip(units).enumerate() {
            let bx = cx - 2 * 130 + i as i32 * 130 + 5;
            let b = Rect { x: bx, y: top, w: 120, h: 110 };
            s.fill_rect(b, PANEL, 0.75);
            s.stroke_rect(b, GREEN, 0.9);
            centered(s, bx + 60, top + 22, value, WHITE, 5);
            centered(s, bx + 60, top + 82, unit, SAND, 1);
        }
    }
    centered(s, cx, l.y(hero.top + hero.height) - 40, el(SCROLL_HINT), DIM, 1);

    /* 3) Contact section */
    if v.panel_shown[1] {
        let panel = l.panels[1];
        centered(s, cx, l.y(panel.top), el(FORM_INTRO), WHITE, 2);
        match v.form.state() {
            FormState::Editing => draw_form(s, l, v),
            FormState::Submitted => centered(s, cx, l.fields[0].y + 14, el(SUCCESS), SAND, 2),
        }
        centered(s, cx, l.submit.y + 70, el(PRIVACY), DIM, 1);
    }
    let contact = l.sections[1];
    centered(s, cx, l.y(contact.top + contact.height) - 28, &format!("(C) ORBE TACTICOS. {}", el(RIGHTS)), DIM, 1);

    /* 4) Navbar on top of the scrolled content */
    s.fill_rect(l.navbar, PANEL, if v.scrolled { 0.92 } else { 0.35 });
    s.text(24, 24, "ORBE TACTICOS", WHITE, 2);
    for (i, r) in l.nav_links.iter().enumerate() {
        let label = el([NAV_HOME, NAV_CONTACT][i.min(1)]);
        let color = if v.active_section == Some(i) { SAND } else { WHITE };
        s.text(r.x, r.y + 9, label, color, 2);
    }
    for (lang, r) in &l.lang_buttons {
        let active = lang == v.active_lang;
        s.fill_rect(*r, if active { GREEN } else { PANEL }, 0.9);
        centered(s, r.x + r.w / 2, r.y + 9, lang, WHITE, 2);
    }
    s.stroke_rect(l.menu_button, SAND, 0.9);
    centered(s, l.menu_button.x + l.menu_button.w / 2, l.menu_button.y + 12, el(MENU), SAND, 1);

    /* 5) Menu overlay */
    if v.menu_open {
        s.fill_rect(Rect { x: 0, y: NAVBAR_H, w: l.width, h: l.height - NAVBAR_H }, PANEL, 0.6);
        s.fill_rect(l.menu_panel, PANEL, 0.95);
        for (i, r) in l.menu_links.iter().enumerate() {
            s.stroke_rect(*r, GREEN, 0.8);
            s.text(r.x + 12, r.y + 11, el([NAV_HOME, NAV_CONTACT][i.min(1)]), WHITE, 2);
        }
    }

    /* 6) HUD */
    let hud = if v.paused { format!("PAUSED | {}", v.hud) } else { v.hud.to_owned() };
    s.text(8, l.height - 14, &hud, DIM, 1);
}

fn draw_form(s: &mut Surface, l: &Layout, v: &PageView<'_>) {
    let form = v.form;
    let inputs = [EMAIL, ORGANIZATION];
    for (i, (field, r)) in form.fields().iter().zip(l.fields).enumerate() {
        s.fill_rect(r, PANEL, 0.85);
        let focused = form.focus() == i;
        s.stroke_rect(r, if focused { SAND } else { GREEN }, 0.9);
        let (text, color) = if field.value.is_empty() {
            (v.elements[inputs[i]].placeholder.clone(), DIM)
        } else {
            (field.value.clone(), WHITE)
        };
        let caret = if focused { "_" } else { "" };
        s.text(r.x + 12, r.y + 15, &format!("{text}{caret}"), color, 2);
    }

    s.fill_rect(l.submit, GREEN, 0.95);
    centered(s, l.submit.x + l.submit.w / 2, l.submit.y + 15, &v.elements[SUBMIT].text, WHITE, 2);

    if let Some(err) = form.last_error() {
        let msg = match err {
            FieldError::Required(_) => &v.elements[ERR_REQUIRED].text,
            FieldError::NotEmail(_) => &v.elements[ERR_EMAIL].text,
        };
        s.text(l.submit.x, l.submit.y + l.submit.h + 10, msg, ERROR, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{I18n, Translations};
    use crate::storage::MemoryStore;

    #[test]
    fn wrap_respects_width_and_keeps_words() {
        assert_eq!(wrap_text("uno dos tres cuatro", 8), vec!["uno dos", "tres", "cuatro"]);
        assert_eq!(wrap_text("supercalifragilistic x", 5), vec!["supercalifragilistic", "x"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn element_table_matches_indices() {
        let els = page_elements();
        assert_eq!(els.len(), ERR_EMAIL + 1);
        assert_eq!(els[DAYS].text, "Días");
        assert_eq!(els[EMAIL].placeholder, "correo@ejemplo.com");
    }

    #[test]
    fn shipped_translations_cover_every_page_key() {
        let t = Translations::from_json_str(include_str!("../data/translations.json")).unwrap();
        for lang in ["es", "en"] {
            let mut store = MemoryStore::default();
            let mut i18n = I18n::restore(t.clone(), &store, "k", "es");
            assert!(i18n.set_language(lang, &mut store));
            let mut els = page_elements();
            // blank every slot so unresolved keys would show up as empty
            for e in &mut els {
                e.text.clear();
                e.placeholder.clear();
                e.aria_label.clear();
            }
            i18n.apply(&mut els);
            assert!(els.iter().all(|e| !e.text.is_empty() || !e.placeholder.is_empty()), "{lang}");
        }
    }

    #[test]
    fn layout_scrolls_form_but_not_navbar() {
        let top = Layout::compute(1000, 800, 0.0, &["en", "es"]);
        let down = Layout::compute(1000, 800, 300.0, &["en", "es"]);
        assert_eq!(top.navbar, down.navbar);
        assert_eq!(top.fields[0].y - 300, down.fields[0].y);
        assert_eq!(top.max_scroll(), 800.0);
    }

    #[test]
    fn hits_resolve_by_priority() {
        let l = Layout::compute(1000, 800, 800.0, &["en", "es"]);
        let center = |r: Rect| ((r.x + r.w / 2) as f32, (r.y + r.h / 2) as f32);

        let (x, y) = center(l.lang_buttons[1].1);
        assert_eq!(l.hit(x, y, false, true), Some(Hit::Lang("es".into())));

        let (x, y) = center(l.fields[1]);
        assert_eq!(l.hit(x, y, false, true), Some(Hit::Field(1)));
        assert_eq!(l.hit(x, y, false, false), None);
        assert_eq!(l.hit(x, y, true, true), Some(Hit::MenuOverlay));

        let (x, y) = center(l.menu_links[0]);
        assert_eq!(l.hit(x, y, true, true), Some(Hit::MenuLink(0)));

        let (x, y) = center(l.submit);
        assert_eq!(l.hit(x, y, false, true), Some(Hit::Submit));

        let (x, y) = center(l.menu_button);
        assert_eq!(l.hit(x, y, true, true), Some(Hit::MenuButton));
    }
}
