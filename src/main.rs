// What you SEE now:
// • A "coming soon" landing page over a slowly drifting particle field.
// • Move the mouse: nearby particles reach toward the cursor.
// • Wheel scrolls down to the notify form; click ES / EN to switch language.
// • Type into the form, Tab to switch fields, Enter to submit.
// • Pause freezes the particles (so does switching to another window). F12 saves a PNG. ESC quits.

use std::time::{Duration, Instant, SystemTime};

use orbe_landing::app::Landing;
use orbe_landing::config::Config;
use orbe_landing::draw::Drawer;
use orbe_landing::error::Error;
use orbe_landing::i18n::Translations;
use orbe_landing::particles::ParticleField;
use orbe_landing::storage::JsonFileStore;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    /* --- Config, local store, translations ---
       Visual: nothing yet; decides language, particle density, launch date. */
    let config = Config::from_env()?;
    let store = JsonFileStore::open(&config.storage.path);
    let translations = Translations::load(&config.i18n.translation_paths);

    /* --- Window + particle field ---
       Visual: window opens; particles scatter over the whole client area. */
    let mut drawer = Drawer::new(
        &config.window.title,
        config.window.width,
        config.window.height,
        config.window.target_fps,
    )?;
    let size = drawer.size();
    let field = ParticleField::initialize(Some(size), config.particles.clone());
    let mut landing = Landing::new(&config, store, translations, size, field)?;
    info!(width = size.0, height = size.1, lang = landing.i18n().current(), "landing page ready");

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let wall = SystemTime::now();

        /* 1) Window size + focus.
           Visual: buffer follows the window at once; particles reshuffle after a short pause. */
        landing.on_window_size(drawer.size(), now);
        let active = drawer.is_active();
        landing.set_hidden(!active);
        if drawer.pause_pressed_once() { landing.toggle_pause(); }

        /* 2) Pointer, wheel, clicks */
        landing.on_pointer(drawer.pointer_pos());
        landing.on_wheel(drawer.scroll_delta());
        if let Some((x, y)) = drawer.left_clicked() {
            landing.on_click(x, y, wall);
        }

        /* 3) Keyboard into the form */
        if drawer.tab_pressed_once() { landing.on_tab(); }
        if drawer.backspace_pressed() { landing.on_backspace(); }
        let typed = drawer.take_typed();
        if !typed.is_empty() { landing.on_chars(&typed); }
        if drawer.enter_pressed_once() { landing.on_enter(wall); }

        /* 4) Particles + page into the frame buffer */
        landing.render(wall, &hud_fps_text);

        if drawer.snapshot_pressed_once() {
            landing.snapshot(&config.window.snapshot_dir, wall);
        }

        /* 5) Present to the window (this is when the on-screen image updates). */
        drawer.present(landing.frame_buffer())?;

        /* 6) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        let since = now.duration_since(last_fps_time);
        if since >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / since.as_secs_f32();
            debug!(fps, "frame rate");
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("window closed");
    Ok(())
}
