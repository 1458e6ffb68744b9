//! Confetti particle engine
//!
//! Burst-based celebration effect. Every `fire()` spawns an independent
//! burst; all live bursts are advanced by one shared fixed-step clock and
//! retired once their last particle expires. Bursts never interact, so
//! overlapping celebrations (rapid key presses, CTA clicks during a goal
//! celebration) simply run side by side.

use crate::display::PixelBuffer;
use crate::util::Rng;

/// Celebration palette: mint, aqua, white, silver
const PALETTE: [(u8, u8, u8); 4] = [
    (0, 255, 136),
    (124, 255, 212),
    (255, 255, 255),
    (189, 189, 189),
];

/// Downward acceleration applied to vy each simulation step
const GRAVITY: f32 = 0.1;

/// Fixed simulation step; kinematic constants are tuned per-step, not per-second
const STEP: f32 = 1.0 / 60.0;

/// Cap on dt folded into the accumulator after a stall
const MAX_FRAME_TIME: f32 = 0.25;

/// Particle count for a full celebration burst
pub const CELEBRATION_COUNT: usize = 120;

/// Particle count for the lighter call-to-action tap
pub const TAP_COUNT: usize = 50;

/// A single confetti particle. Owned by exactly one burst; removed forever
/// once its life runs out or it falls past the bottom edge.
#[derive(Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: (u8, u8, u8),
    pub size: f32,
    pub life: f32,
    pub decay: f32,
}

impl Particle {
    fn spawn(rng: &mut Rng, width: u32) -> Self {
        Self {
            x: rng.range_f32(0.0, width as f32),
            y: -10.0, // above the visible area
            vx: rng.range_f32(-2.0, 2.0),
            vy: rng.range_f32(2.0, 5.0),
            color: *rng.pick(&PALETTE),
            size: rng.range_f32(2.0, 6.0),
            life: 1.0,
            decay: rng.range_f32(0.01, 0.03),
        }
    }

    /// Removal invariant: expired or fallen past the bottom edge
    #[inline]
    fn is_alive(&self, height: f32) -> bool {
        self.life > 0.0 && self.y <= height
    }
}

/// One firing of the engine: an independent, self-terminating particle set
struct Burst {
    particles: Vec<Particle>,
}

impl Burst {
    fn new(count: usize, rng: &mut Rng, width: u32) -> Self {
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(Particle::spawn(rng, width));
        }
        Self { particles }
    }

    /// Advance one fixed step: integrate, apply gravity, age, then drop
    /// particles meeting the removal invariant (swap-remove, order is
    /// irrelevant since particles don't interact)
    fn step(&mut self, height: f32) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += GRAVITY;
            p.life -= p.decay;
        }

        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].is_alive(height) {
                i += 1;
            } else {
                self.particles.swap_remove(i);
            }
        }
    }

    fn is_done(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Confetti engine: spawns bursts and drives them all from one clock
pub struct ConfettiEngine {
    bursts: Vec<Burst>,
    rng: Rng,
    width: u32,
    height: u32,
    accum: f32,
}

impl ConfettiEngine {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            bursts: Vec::new(),
            rng: Rng::new(seed),
            width,
            height,
            accum: 0.0,
        }
    }

    /// Fire a burst of `count` particles
    pub fn fire(&mut self, count: usize) {
        let burst = Burst::new(count, &mut self.rng, self.width);
        self.bursts.push(burst);
    }

    /// Full celebration (goal reached, R key)
    pub fn fire_celebration(&mut self) {
        self.fire(CELEBRATION_COUNT);
    }

    /// Lighter burst for call-to-action clicks
    pub fn fire_tap(&mut self) {
        self.fire(TAP_COUNT);
    }

    /// Advance the simulation by wall-clock dt, stepping at a fixed 60 Hz.
    /// Empty bursts are retired; with none left the engine is idle and the
    /// accumulator is drained so a later burst doesn't start with a backlog.
    pub fn update(&mut self, dt: f32) {
        if self.bursts.is_empty() {
            self.accum = 0.0;
            return;
        }

        self.accum += dt.min(MAX_FRAME_TIME);
        let height = self.height as f32;
        while self.accum >= STEP {
            self.accum -= STEP;
            for burst in &mut self.bursts {
                burst.step(height);
            }
        }
        self.bursts.retain(|b| !b.is_done());
    }

    /// Draw every live particle as a filled circle fading with its life
    pub fn render(&self, buffer: &mut PixelBuffer) {
        for burst in &self.bursts {
            for p in &burst.particles {
                let alpha = (p.life.clamp(0.0, 1.0) * 255.0) as u8;
                buffer.fill_circle_blend(
                    p.x as i32,
                    p.y as i32,
                    p.size as i32,
                    p.color.0,
                    p.color.1,
                    p.color.2,
                    alpha,
                );
            }
        }
    }

    /// True when no burst is running (nothing will be drawn)
    pub fn is_idle(&self) -> bool {
        self.bursts.is_empty()
    }

    /// Total live particles across all bursts
    pub fn particle_count(&self) -> usize {
        self.bursts.iter().map(|b| b.particles.len()).sum()
    }

    /// Number of concurrently running bursts
    pub fn burst_count(&self) -> usize {
        self.bursts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worst-case lifetime: decay >= 0.01 drains life in at most 100 steps
    const MAX_STEPS: usize = 100;

    fn step_until_idle(engine: &mut ConfettiEngine, max_steps: usize) -> usize {
        for steps in 0..=max_steps {
            if engine.is_idle() {
                return steps;
            }
            engine.update(STEP);
        }
        panic!(
            "engine still running after {} steps ({} particles)",
            max_steps,
            engine.particle_count()
        );
    }

    #[test]
    fn test_spawn_attribute_ranges() {
        let mut rng = Rng::new(0xC0FFEE);
        for _ in 0..1000 {
            let p = Particle::spawn(&mut rng, 640);
            assert!(p.x >= 0.0 && p.x < 640.0);
            assert_eq!(p.y, -10.0);
            assert!(p.vx >= -2.0 && p.vx < 2.0);
            assert!(p.vy >= 2.0 && p.vy < 5.0, "vy must bias downward");
            assert!(p.size >= 2.0 && p.size < 6.0);
            assert_eq!(p.life, 1.0);
            assert!(p.decay >= 0.01 && p.decay < 0.03);
            assert!(PALETTE.contains(&p.color));
        }
    }

    #[test]
    fn test_burst_terminates_within_bound() {
        let mut engine = ConfettiEngine::new(640, 480, 1);
        engine.fire_celebration();
        assert_eq!(engine.particle_count(), CELEBRATION_COUNT);
        let steps = step_until_idle(&mut engine, MAX_STEPS + 1);
        assert!(steps <= MAX_STEPS + 1, "took {} steps", steps);
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_life_is_monotonically_decreasing() {
        let mut engine = ConfettiEngine::new(640, 480, 7);
        engine.fire(1);
        let mut last = 1.0;
        while !engine.is_idle() {
            engine.update(STEP);
            if let Some(p) = engine.bursts.first().and_then(|b| b.particles.first()) {
                assert!(p.life < last);
                last = p.life;
            }
        }
    }

    #[test]
    fn test_short_viewport_removes_fallen_particles() {
        // With a 1px-tall surface every particle exits the visible range
        // long before its life runs out
        let mut engine = ConfettiEngine::new(640, 1, 3);
        engine.fire(40);
        let steps = step_until_idle(&mut engine, MAX_STEPS);
        assert!(steps < 20, "exit by position should be quick, took {}", steps);
    }

    #[test]
    fn test_concurrent_bursts_run_independently() {
        let mut engine = ConfettiEngine::new(640, 480, 11);
        engine.fire_celebration();
        for _ in 0..10 {
            engine.update(STEP);
        }
        engine.fire_tap();
        assert_eq!(engine.burst_count(), 2);
        assert!(engine.particle_count() <= CELEBRATION_COUNT + TAP_COUNT);

        // Both complete; no orphaned particles afterwards
        step_until_idle(&mut engine, 2 * MAX_STEPS);
        assert_eq!(engine.burst_count(), 0);
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_idle_engine_renders_nothing() {
        let mut engine = ConfettiEngine::new(16, 16, 5);
        engine.fire(10);
        step_until_idle(&mut engine, MAX_STEPS);

        let mut buffer = PixelBuffer::with_size(16, 16);
        buffer.clear(0, 0, 0);
        engine.render(&mut buffer);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(buffer.get_pixel(x, y), Some((0, 0, 0)));
            }
        }
    }

    #[test]
    fn test_stalled_frame_does_not_backlog() {
        let mut engine = ConfettiEngine::new(640, 480, 13);
        engine.fire(5);
        // A multi-second stall is clamped instead of replayed
        engine.update(10.0);
        assert!(engine.particle_count() <= 5);
    }

    #[test]
    fn test_gravity_accelerates_downward() {
        let mut engine = ConfettiEngine::new(640, 10_000, 17);
        engine.fire(1);
        let vy0 = engine.bursts[0].particles[0].vy;
        engine.update(STEP);
        let vy1 = engine.bursts[0].particles[0].vy;
        assert!(vy1 > vy0);
    }
}
