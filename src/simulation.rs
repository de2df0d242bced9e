use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::maze::Maze;
use crate::settings::SimulationSettings;

/// Rejection-sampling budget per spawn. Roughly half of a healthy maze is
/// open, so this fails only on degenerate all-wall grids.
const SPAWN_ATTEMPTS: usize = 10_000;

/// Hard cap on the particle population.
pub const MAX_PARTICLES: usize = 500;

/// A point drifting through the maze's corridors.
///
/// Velocity is a unit direction plus a speed scalar. The trail keeps the
/// last `trail_length` positions, oldest evicted first; the renderer reads
/// it back to front for the fade.
pub struct Particle {
    pub x: f32,
    pub y: f32,
    dx: f32,
    dy: f32,
    speed: f32,
    pub radius: f32,
    pub hue: f32,
    trail: VecDeque<(f32, f32)>,
}

/// Candidate headings whose probe point lands in an open cell.
///
/// Pure function of position and maze; steering carries no mode flag and is
/// recomputed from local geometry on every blocked tick.
pub fn open_headings(
    maze: &Maze,
    x: f32,
    y: f32,
    samples: usize,
    probe_distance: f32,
) -> Vec<f32> {
    let mut open = Vec::new();
    for i in 0..samples {
        let angle = i as f32 * TAU / samples as f32;
        let px = x + angle.cos() * probe_distance;
        let py = y + angle.sin() * probe_distance;
        if !maze.is_wall(px, py) {
            open.push(angle);
        }
    }
    open
}

impl Particle {
    /// Place a particle on a random open cell by rejection sampling.
    /// Returns `None` when the maze has no open cells or the attempt
    /// budget runs out.
    pub fn spawn(maze: &Maze, settings: &SimulationSettings, rng: &mut impl Rng) -> Option<Self> {
        if !maze.has_open_cell() {
            return None;
        }
        for _ in 0..SPAWN_ATTEMPTS {
            let x = rng.gen_range(0.0..maze.pixel_width());
            let y = rng.gen_range(0.0..maze.pixel_height());
            if maze.is_wall(x, y) {
                continue;
            }
            let angle = rng.gen_range(0.0..TAU);
            return Some(Self {
                x,
                y,
                dx: angle.cos(),
                dy: angle.sin(),
                speed: rng.gen_range(settings.min_speed..=settings.max_speed),
                radius: rng.gen_range(settings.min_radius..=settings.max_radius),
                hue: rng.gen_range(0.0..360.0),
                trail: VecDeque::with_capacity(settings.trail_length + 1),
            });
        }
        None
    }

    /// Advance one tick: move along the current heading if the next point
    /// is open, otherwise rescan for an open heading. The committed
    /// position is never a wall.
    pub fn update(&mut self, maze: &Maze, settings: &SimulationSettings, rng: &mut impl Rng) {
        let step = self.speed * settings.speed_scale;
        let next_x = self.x + self.dx * step;
        let next_y = self.y + self.dy * step;

        if !maze.is_wall(next_x, next_y) {
            self.x = next_x;
            self.y = next_y;
        } else {
            let probe = maze.cell_size() * settings.probe_distance;
            let headings = open_headings(maze, self.x, self.y, settings.probe_samples, probe);
            if headings.is_empty() {
                // Every probe hit a wall. Reverse with a little jitter so
                // the next scan starts from a different heading.
                let jx = -self.dx + rng.gen_range(-0.25..0.25);
                let jy = -self.dy + rng.gen_range(-0.25..0.25);
                let len = (jx * jx + jy * jy).sqrt().max(1e-6);
                self.dx = jx / len;
                self.dy = jy / len;
            } else {
                // Aesthetic wandering: a random admissible heading and a
                // fresh speed, not the shortest way around the wall.
                let angle = headings[rng.gen_range(0..headings.len())];
                self.dx = angle.cos();
                self.dy = angle.sin();
                self.speed = rng.gen_range(settings.min_speed..=settings.max_speed);
            }
        }

        self.trail.push_back((self.x, self.y));
        while self.trail.len() > settings.trail_length {
            self.trail.pop_front();
        }

        self.hue = (self.hue + settings.hue_drift) % 360.0;
    }

    /// Heading angle in radians, for direction-based coloring.
    pub fn heading(&self) -> f32 {
        self.dy.atan2(self.dx)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Past positions, oldest first.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = (f32, f32)> + '_ {
        self.trail.iter().copied()
    }

    #[cfg(test)]
    fn velocity(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }
}

/// One independent simulation: a maze, its particle population and the
/// tick loop. Owns its RNG so several simulations can run in one process.
pub struct MazeSimulation {
    width: f32,
    height: f32,
    maze: Maze,
    particles: Vec<Particle>,
    pub settings: SimulationSettings,
    pub paused: bool,
    ticks: u64,
    rng: ThreadRng,
}

impl MazeSimulation {
    pub fn new(width: f32, height: f32, settings: SimulationSettings) -> Self {
        let mut rng = rand::thread_rng();
        let maze = Maze::generate(width, height, settings.cell_size, &mut rng);
        let mut sim = Self {
            width,
            height,
            maze,
            particles: Vec::new(),
            settings,
            paused: false,
            ticks: 0,
            rng,
        };
        sim.populate();
        sim
    }

    /// One tick: every live particle advances once. Particles only read
    /// the maze and never each other, so update order is irrelevant.
    pub fn step(&mut self) {
        if self.paused {
            return;
        }
        for particle in &mut self.particles {
            particle.update(&self.maze, &self.settings, &mut self.rng);
        }
        self.ticks += 1;
    }

    /// Full reset: carve a new maze and re-seed every particle. Prior
    /// state is discarded, never patched.
    pub fn regenerate(&mut self) {
        self.maze = Maze::generate(self.width, self.height, self.settings.cell_size, &mut self.rng);
        self.populate();
        self.ticks = 0;
    }

    /// React to a viewport change. A resize is a regenerate, not an
    /// incremental adjustment.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.regenerate();
        }
    }

    fn populate(&mut self) {
        self.particles.clear();
        self.fill_to_target();
    }

    fn fill_to_target(&mut self) {
        while self.particles.len() < self.settings.num_particles {
            match Particle::spawn(&self.maze, &self.settings, &mut self.rng) {
                Some(particle) => self.particles.push(particle),
                None => break,
            }
        }
    }

    /// Change the population without touching the maze: surplus particles
    /// are dropped, missing ones spawn on open cells.
    pub fn adjust_particles(&mut self, delta: i32) {
        let target = (self.settings.num_particles as i32 + delta).clamp(1, MAX_PARTICLES as i32);
        self.settings.num_particles = target as usize;
        self.particles.truncate(self.settings.num_particles);
        self.fill_to_target();
    }

    /// Cell size changes the grid shape, so it forces a regenerate.
    pub fn adjust_cell_size(&mut self, delta: f32) {
        let before = self.settings.cell_size;
        self.settings.adjust_cell_size(delta);
        if self.settings.cell_size != before {
            self.regenerate();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_maze(cols: usize, rows: usize, seed: u64) -> Maze {
        let mut rng = StdRng::seed_from_u64(seed);
        Maze::generate(cols as f32 * 10.0, rows as f32 * 10.0, 10.0, &mut rng)
    }

    #[test]
    fn spawned_particles_sit_on_open_cells() {
        let maze = test_maze(21, 15, 1);
        let settings = SimulationSettings::default();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let p = Particle::spawn(&maze, &settings, &mut rng).unwrap();
            assert!(!maze.is_wall(p.x, p.y));
        }
    }

    #[test]
    fn spawn_gives_up_on_an_all_wall_maze() {
        let mut rng = StdRng::seed_from_u64(3);
        let maze = Maze::generate(50.0, 10.0, 10.0, &mut rng);
        let settings = SimulationSettings::default();
        assert!(Particle::spawn(&maze, &settings, &mut rng).is_none());
    }

    #[test]
    fn particles_never_commit_a_wall_position() {
        let maze = test_maze(25, 19, 7);
        let settings = SimulationSettings::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut particle = Particle::spawn(&maze, &settings, &mut rng).unwrap();

        for tick in 0..10_000 {
            particle.update(&maze, &settings, &mut rng);
            assert!(
                !maze.is_wall(particle.x, particle.y),
                "walled at tick {tick}: ({}, {})",
                particle.x,
                particle.y
            );
        }
    }

    #[test]
    fn trail_never_outgrows_its_capacity() {
        let maze = test_maze(15, 15, 4);
        let mut settings = SimulationSettings::default();
        settings.trail_length = 15;
        let mut rng = StdRng::seed_from_u64(5);
        let mut particle = Particle::spawn(&maze, &settings, &mut rng).unwrap();

        for _ in 0..200 {
            particle.update(&maze, &settings, &mut rng);
            assert!(particle.trail().len() <= settings.trail_length);
        }
        assert_eq!(particle.trail().len(), settings.trail_length);

        // Shrinking the capacity takes effect on the next tick.
        settings.trail_length = 4;
        particle.update(&maze, &settings, &mut rng);
        assert_eq!(particle.trail().len(), 4);
    }

    #[test]
    fn blocked_particle_redirects_within_one_tick() {
        // 3x3 maze: only the center cell is open. A particle aimed at the
        // wall must turn instead of committing the move.
        let mut rng = StdRng::seed_from_u64(6);
        let maze = Maze::generate(30.0, 30.0, 10.0, &mut rng);
        let settings = SimulationSettings::default();

        let mut particle = Particle::spawn(&maze, &settings, &mut rng).unwrap();
        particle.x = 15.0;
        particle.y = 15.0;
        particle.dx = 1.0;
        particle.dy = 0.0;
        particle.speed = 20.0;

        for _ in 0..50 {
            particle.update(&maze, &settings, &mut rng);
            assert!(!maze.is_wall(particle.x, particle.y));
        }
    }

    #[test]
    fn enclosed_probe_reverses_the_heading() {
        // A probe reaching past the entire 3x3 maze finds no open heading,
        // which triggers the reversal branch.
        let mut rng = StdRng::seed_from_u64(8);
        let maze = Maze::generate(30.0, 30.0, 10.0, &mut rng);
        let mut settings = SimulationSettings::default();
        settings.probe_distance = 5.0;

        let mut particle = Particle::spawn(&maze, &settings, &mut rng).unwrap();
        particle.x = 15.0;
        particle.y = 15.0;
        particle.dx = 1.0;
        particle.dy = 0.0;
        particle.speed = 20.0;

        particle.update(&maze, &settings, &mut rng);

        assert_eq!((particle.x, particle.y), (15.0, 15.0));
        let (dx, dy) = particle.velocity();
        assert!(dx < 0.0, "expected a reversed heading, got ({dx}, {dy})");
        assert!((dx * dx + dy * dy - 1.0).abs() < 1e-3);
    }

    #[test]
    fn hue_drifts_and_wraps() {
        let maze = test_maze(15, 15, 9);
        let mut settings = SimulationSettings::default();
        settings.hue_drift = 100.0;
        let mut rng = StdRng::seed_from_u64(10);
        let mut particle = Particle::spawn(&maze, &settings, &mut rng).unwrap();

        for _ in 0..20 {
            particle.update(&maze, &settings, &mut rng);
            assert!((0.0..360.0).contains(&particle.hue));
        }
    }

    #[test]
    fn simulation_populates_and_steps() {
        let mut sim = MazeSimulation::new(250.0, 190.0, SimulationSettings::default());
        assert_eq!(sim.particles().len(), sim.settings.num_particles);

        sim.step();
        assert_eq!(sim.ticks(), 1);
        for p in sim.particles() {
            assert!(!sim.maze().is_wall(p.x, p.y));
        }

        sim.toggle_pause();
        sim.step();
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn resize_is_a_full_reset() {
        let mut sim = MazeSimulation::new(250.0, 190.0, SimulationSettings::default());
        for _ in 0..5 {
            sim.step();
        }

        sim.resize(410.0, 310.0);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.maze().cols(), 34);
        assert_eq!(sim.maze().rows(), 25);
        for p in sim.particles() {
            assert!(!sim.maze().is_wall(p.x, p.y));
        }
    }

    #[test]
    fn particle_count_adjusts_without_a_reset() {
        let mut sim = MazeSimulation::new(250.0, 190.0, SimulationSettings::default());
        let cols_before = sim.maze().cols();

        sim.adjust_particles(25);
        assert_eq!(sim.particles().len(), sim.settings.num_particles);

        sim.adjust_particles(-1_000);
        assert_eq!(sim.particles().len(), 1);
        assert_eq!(sim.maze().cols(), cols_before);
    }

    #[test]
    fn degenerate_viewport_runs_with_zero_particles() {
        let mut sim = MazeSimulation::new(10.0, 10.0, SimulationSettings::default());
        assert!(sim.particles().is_empty());
        sim.step();
    }
}
