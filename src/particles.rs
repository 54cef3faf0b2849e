// Particle field: the animated background behind the landing page.
// Visual outcomes:
// - Faint green dots drift slowly and wrap around the window edges.
// - Dots closer than `particle_link_distance` are joined by a green line that
//   fades out as they separate.
// - While the pointer is over the window, nearby dots reach toward it with
//   sand-colored lines.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::draw::Canvas;
use crate::types::Rgb;

pub const PARTICLE_COLOR: Rgb = Rgb::new(45, 95, 63);
pub const POINTER_LINK_COLOR: Rgb = Rgb::new(212, 165, 116);
pub const PARTICLE_LINK_MAX_OPACITY: f32 = 0.3;
pub const POINTER_LINK_MAX_OPACITY: f32 = 0.5;

const RADIUS_RANGE: (f32, f32) = (0.5, 2.5);
const SPEED_LIMIT: f32 = 0.25; // px/frame on each axis
const OPACITY_RANGE: (f32, f32) = (0.1, 0.6);

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub particle_link_distance: f32,
    pub pointer_link_distance: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self { particle_count: 50, particle_link_distance: 150.0, pointer_link_distance: 200.0 }
    }
}

/// One drifting dot.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32, pub y: f32,        // position in pixels
    pub vx: f32, pub vy: f32,      // velocity in px/frame
    pub radius: f32,
    pub opacity: f32,
}

/// A particle-particle connection worth drawing this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

/// A particle-pointer connection worth drawing this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerLink {
    pub particle: usize,
    pub opacity: f32,
}

/// Linear falloff: `max` at distance 0, exactly 0 at `threshold`.
#[inline]
pub fn link_opacity(distance: f32, threshold: f32, max: f32) -> f32 {
    if threshold <= 0.0 || distance >= threshold { return 0.0; }
    (1.0 - distance / threshold) * max
}

pub struct ParticleField {
    config: FieldConfig,
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    pointer: Option<(f32, f32)>,
    running: bool,
    rng: SmallRng,
}

impl ParticleField {
    /// Size the field to `surface` and scatter `config.particle_count` particles.
    /// No surface, no field.
    pub fn initialize(surface: Option<(usize, usize)>, config: FieldConfig) -> Option<Self> {
        Self::initialize_with_rng(surface, config, SmallRng::from_entropy())
    }

    /// Same as `initialize` with a caller-provided RNG (deterministic runs).
    pub fn initialize_with_rng(
        surface: Option<(usize, usize)>,
        config: FieldConfig,
        rng: SmallRng,
    ) -> Option<Self> {
        let (w, h) = surface?;
        let mut field = Self {
            config,
            width: w as f32,
            height: h as f32,
            particles: Vec::new(),
            pointer: None,
            running: true,
            rng,
        };
        field.regenerate();
        Some(field)
    }

    /// New viewport size: old particles are discarded and a fresh batch is scattered,
    /// so density stays uniform.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width as f32;
        self.height = height as f32;
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let (w, h) = (self.width, self.height);
        let rng = &mut self.rng;
        self.particles = (0..self.config.particle_count)
            .map(|_| Particle {
                x: if w > 0.0 { rng.gen_range(0.0..w) } else { 0.0 },
                y: if h > 0.0 { rng.gen_range(0.0..h) } else { 0.0 },
                vx: rng.gen_range(-SPEED_LIMIT..SPEED_LIMIT),
                vy: rng.gen_range(-SPEED_LIMIT..SPEED_LIMIT),
                radius: rng.gen_range(RADIUS_RANGE.0..RADIUS_RANGE.1),
                opacity: rng.gen_range(OPACITY_RANGE.0..OPACITY_RANGE.1),
            })
            .collect();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Advance every particle one frame, wrapping each axis independently.
    pub fn tick(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.x = wrap(p.x + p.vx, w);
            p.y = wrap(p.y + p.vy, h);
        }
    }

    /// Pairs closer than the particle link distance, naive O(n²).
    pub fn links(&self) -> Vec<Link> {
        let threshold = self.config.particle_link_distance;
        let t2 = threshold * threshold;
        let mut out = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let (dx, dy) = (a.x - b.x, a.y - b.y);
                let d2 = dx * dx + dy * dy;
                if d2 >= t2 { continue; }
                let opacity = link_opacity(d2.sqrt(), threshold, PARTICLE_LINK_MAX_OPACITY);
                out.push(Link { a: i, b: j, opacity });
            }
        }
        out
    }

    /// Particles within reach of the pointer; empty when the pointer is away.
    pub fn pointer_links(&self) -> Vec<PointerLink> {
        let Some((px, py)) = self.pointer else { return Vec::new() };
        let threshold = self.config.pointer_link_distance;
        let t2 = threshold * threshold;
        self.particles
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let (dx, dy) = (p.x - px, p.y - py);
                let d2 = dx * dx + dy * dy;
                (d2 < t2).then(|| PointerLink {
                    particle: i,
                    opacity: link_opacity(d2.sqrt(), threshold, POINTER_LINK_MAX_OPACITY),
                })
            })
            .collect()
    }

    /// Clear, dots, then links on top.
    pub fn render(&self, canvas: &mut impl Canvas) {
        canvas.clear();

        for p in &self.particles {
            canvas.fill_circle(p.x, p.y, p.radius, PARTICLE_COLOR, p.opacity);
        }

        for link in self.links() {
            let (a, b) = (&self.particles[link.a], &self.particles[link.b]);
            canvas.stroke_line(a.x, a.y, b.x, b.y, PARTICLE_COLOR, link.opacity);
        }

        if let Some((px, py)) = self.pointer {
            for link in self.pointer_links() {
                let p = &self.particles[link.particle];
                canvas.stroke_line(p.x, p.y, px, py, POINTER_LINK_COLOR, link.opacity);
            }
        }
    }

    /// One scheduled frame. Returns false (and touches nothing) while paused.
    pub fn frame(&mut self, canvas: &mut impl Canvas) -> bool {
        if !self.running { return false; }
        self.tick();
        self.render(canvas);
        true
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    fn with_particles(width: f32, height: f32, config: FieldConfig, particles: Vec<Particle>) -> Self {
        Self {
            config,
            width,
            height,
            particles,
            pointer: None,
            running: true,
            rng: SmallRng::seed_from_u64(7),
        }
    }
}

/// Wrap `v` into [0, size). Handles steps larger than one lap.
#[inline]
fn wrap(v: f32, size: f32) -> f32 {
    if size <= 0.0 { return 0.0; }
    let w = v.rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative inputs
    if w >= size { 0.0 } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Records draw calls instead of rasterizing them.
    #[derive(Default)]
    struct Recorder {
        clears: usize,
        circles: Vec<(f32, f32, f32, f32)>,
        lines: Vec<(f32, f32, f32, f32, Rgb, f32)>,
    }

    impl Canvas for Recorder {
        fn size(&self) -> (usize, usize) { (800, 600) }
        fn clear(&mut self) { self.clears += 1; }
        fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, _color: Rgb, alpha: f32) {
            self.circles.push((cx, cy, radius, alpha));
        }
        fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb, alpha: f32) {
            self.lines.push((x0, y0, x1, y1, color, alpha));
        }
    }

    fn still(x: f32, y: f32) -> Particle {
        Particle { x, y, vx: 0.0, vy: 0.0, radius: 1.0, opacity: 0.5 }
    }

    fn seeded(w: usize, h: usize, config: FieldConfig) -> ParticleField {
        ParticleField::initialize_with_rng(Some((w, h)), config, SmallRng::seed_from_u64(42))
            .expect("surface present")
    }

    #[test]
    fn no_surface_means_no_field() {
        assert!(ParticleField::initialize(None, FieldConfig::default()).is_none());
    }

    #[test]
    fn initialize_scatters_configured_count_within_ranges() {
        let field = seeded(640, 480, FieldConfig::default());
        assert_eq!(field.particles().len(), 50);
        for p in field.particles() {
            assert!((0.0..640.0).contains(&p.x) && (0.0..480.0).contains(&p.y));
            assert!((RADIUS_RANGE.0..RADIUS_RANGE.1).contains(&p.radius));
            assert!(p.vx.abs() <= SPEED_LIMIT && p.vy.abs() <= SPEED_LIMIT);
            assert!((OPACITY_RANGE.0..OPACITY_RANGE.1).contains(&p.opacity));
        }
    }

    #[test]
    fn resize_always_yields_configured_count() {
        let config = FieldConfig { particle_count: 12, ..FieldConfig::default() };
        let mut field = ParticleField::with_particles(10.0, 10.0, config, vec![still(1.0, 1.0); 3]);
        field.resize(300, 200);
        assert_eq!(field.particles().len(), 12);
        assert_eq!(field.size(), (300.0, 200.0));
        field.resize(50, 50);
        assert_eq!(field.particles().len(), 12);
        assert!(field.particles().iter().all(|p| p.x < 50.0 && p.y < 50.0));
    }

    #[test]
    fn tick_wraps_each_axis_independently() {
        let mut p = still(99.9, 50.0);
        p.vx = 0.25;
        let mut q = still(10.0, 0.1);
        q.vy = -0.25;
        let mut field = ParticleField::with_particles(100.0, 100.0, FieldConfig::default(), vec![p, q]);
        field.tick();
        let ps = field.particles();
        assert!(ps[0].x < 1.0 && (ps[0].y - 50.0).abs() < 1e-6);
        assert!(ps[1].y > 99.0 && (ps[1].x - 10.0).abs() < 1e-6);
    }

    #[test]
    fn links_only_below_threshold() {
        let config = FieldConfig { particle_link_distance: 100.0, ..FieldConfig::default() };
        let field = ParticleField::with_particles(
            1000.0, 1000.0, config,
            vec![still(0.0, 0.0), still(60.0, 80.0), still(500.0, 500.0), still(0.0, 99.0)],
        );
        let links = field.links();
        // (0,1) at exactly 100 is excluded; (0,3) at 99 is kept; (1,3) at ~61 is kept
        let pairs: Vec<(usize, usize)> = links.iter().map(|l| (l.a, l.b)).collect();
        assert_eq!(pairs, vec![(0, 3), (1, 3)]);
        assert!(links.iter().all(|l| l.opacity > 0.0 && l.opacity <= PARTICLE_LINK_MAX_OPACITY));
    }

    #[test]
    fn pointer_links_follow_pointer_state() {
        let field_particles = vec![still(10.0, 10.0), still(400.0, 400.0)];
        let mut field = ParticleField::with_particles(500.0, 500.0, FieldConfig::default(), field_particles);
        assert!(field.pointer_links().is_empty());

        field.pointer_move(10.0, 10.0);
        let links = field.pointer_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].particle, 0);
        assert!((links[0].opacity - POINTER_LINK_MAX_OPACITY).abs() < 1e-6);

        field.pointer_leave();
        assert!(field.pointer_links().is_empty());
    }

    #[test]
    fn render_draws_clear_dots_links_and_pointer_links() {
        let mut field = ParticleField::with_particles(
            500.0, 500.0, FieldConfig::default(),
            vec![still(0.0, 0.0), still(30.0, 40.0)],
        );
        field.pointer_move(0.0, 10.0);
        let mut rec = Recorder::default();
        field.render(&mut rec);

        assert_eq!(rec.clears, 1);
        assert_eq!(rec.circles.len(), 2);
        // one particle pair + two pointer links
        assert_eq!(rec.lines.len(), 3);
        assert_eq!(rec.lines[0].4, PARTICLE_COLOR);
        assert!((rec.lines[0].5 - (1.0 - 50.0 / 150.0) * 0.3).abs() < 1e-6);
        assert!(rec.lines[1..].iter().all(|l| l.4 == POINTER_LINK_COLOR && l.2 == 0.0 && l.3 == 10.0));
    }

    #[test]
    fn paused_frames_do_not_move_particles() {
        let mut field = seeded(320, 240, FieldConfig::default());
        let mut rec = Recorder::default();
        assert!(field.frame(&mut rec));

        let before = field.particles().to_vec();
        field.pause();
        for _ in 0..100 {
            assert!(!field.frame(&mut rec));
        }
        assert_eq!(field.particles(), &before[..]);

        field.resume();
        assert!(field.frame(&mut rec));
        for (p, b) in field.particles().iter().zip(&before) {
            // exactly one step of motion, modulo wrap
            let dx = (p.x - wrap(b.x + b.vx, 320.0)).abs();
            let dy = (p.y - wrap(b.y + b.vy, 240.0)).abs();
            assert!(dx < 1e-4 && dy < 1e-4);
        }
    }

    proptest! {
        #[test]
        fn tick_keeps_particles_inside(
            w in 1usize..2000,
            h in 1usize..2000,
            steps in 1usize..50,
            seed in any::<u64>(),
        ) {
            let mut field = ParticleField::initialize_with_rng(
                Some((w, h)),
                FieldConfig { particle_count: 20, ..FieldConfig::default() },
                SmallRng::seed_from_u64(seed),
            ).unwrap();
            for _ in 0..steps {
                field.tick();
                for p in field.particles() {
                    prop_assert!(p.x >= 0.0 && p.x < w as f32);
                    prop_assert!(p.y >= 0.0 && p.y < h as f32);
                }
            }
        }

        #[test]
        fn wrap_lands_in_range(v in -1.0e6f32..1.0e6, size in 0.5f32..5000.0) {
            let w = wrap(v, size);
            prop_assert!(w >= 0.0 && w < size);
        }

        #[test]
        fn opacity_falls_monotonically_to_zero(
            d1 in 0.0f32..300.0,
            d2 in 0.0f32..300.0,
            threshold in 1.0f32..300.0,
        ) {
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let o_near = link_opacity(near, threshold, 0.3);
            let o_far = link_opacity(far, threshold, 0.3);
            prop_assert!(o_near >= o_far);
            if far >= threshold { prop_assert_eq!(o_far, 0.0); }
            prop_assert_eq!(link_opacity(threshold, threshold, 0.3), 0.0);
        }
    }
}
