//! The coordinate plane: associates every screen pixel with a point on the
//! complex plane and tracks its escape-time iteration state across frames.

use crate::error::Error;
use crate::functions::FunctionVariant;
use crate::point::Point;
use crate::xy::XY;

/// Construction/reset parameters for a [`CoordinatePlane`].
#[derive(Debug, Clone, Copy)]
pub struct PlaneConfig {
    pub width: u32,
    pub height: u32,
    pub center: XY,
    pub resolution_x: f64,
    pub resolution_y: f64,
    pub function_index: usize,
    pub seed: XY,
    pub skip_rounds: u32,
    pub halt_after: u64,
    pub num_threads: u32,
}

/// The data model of spec.md §3: per-point iteration state plus the derived
/// axis extents, and the book-keeping the iteration engine needs (the live
/// list, its scratch buffers, and the running counters).
pub struct CoordinatePlane {
    pub win_width: u32,
    pub win_height: u32,
    pub center: XY,
    pub resolution_x: f64,
    pub resolution_y: f64,
    pub function_index: usize,
    pub seed: XY,
    pub skip_rounds: u32,
    pub halt_after: u64,
    pub num_threads: u32,

    pub iteration_count: u64,
    pub escaped: usize,
    pub trapped: usize,
    pub unchanged: u64,

    pub all_points: Vec<Point>,
    /// Indices into `all_points` that are neither escaped nor trapped.
    pub live: Vec<usize>,
    /// Scratch buffer, same capacity as `all_points`, used by the engine as
    /// per-worker compaction output (see `engine::Engine::iterate`).
    pub scratch: Vec<usize>,
}

impl CoordinatePlane {
    /// Allocates buffers sized to `width*height` and performs the initial reset.
    pub fn new(config: PlaneConfig) -> Result<CoordinatePlane, Error> {
        let mut plane = CoordinatePlane {
            win_width: config.width,
            win_height: config.height,
            center: config.center,
            resolution_x: config.resolution_x,
            resolution_y: config.resolution_y,
            function_index: config.function_index,
            seed: config.seed,
            skip_rounds: config.skip_rounds,
            halt_after: config.halt_after,
            num_threads: config.num_threads.max(1),
            iteration_count: 0,
            escaped: 0,
            trapped: 0,
            unchanged: 0,
            all_points: Vec::new(),
            live: Vec::new(),
            scratch: Vec::new(),
        };
        plane.reset(config)?;
        Ok(plane)
    }

    fn function(&self) -> FunctionVariant {
        FunctionVariant::from_index(self.function_index)
    }

    /// Derived visible rectangle (spec.md §3): `x_min = center.x -
    /// res_x*(width/2)`, and so on for the other three edges.
    pub fn x_min(&self) -> f64 {
        self.center.x - self.resolution_x * (self.win_width as f64 / 2.0)
    }
    pub fn x_max(&self) -> f64 {
        self.center.x + self.resolution_x * (self.win_width as f64 / 2.0)
    }
    pub fn y_min(&self) -> f64 {
        self.center.y - self.resolution_y * (self.win_height as f64 / 2.0)
    }
    pub fn y_max(&self) -> f64 {
        self.center.y + self.resolution_y * (self.win_height as f64 / 2.0)
    }

    fn x_span(&self) -> f64 {
        self.resolution_x * self.win_width as f64
    }
    fn y_span(&self) -> f64 {
        self.resolution_y * self.win_height as f64
    }

    /// Re-initialises all per-point state, preserving the allocation when it
    /// is already large enough (spec.md §4.2 "Reset").
    pub fn reset(&mut self, config: PlaneConfig) -> Result<(), Error> {
        if config.resolution_x <= 0.0 || config.resolution_y <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "resolution must be positive, got ({}, {})",
                config.resolution_x, config.resolution_y
            )));
        }
        if !config.resolution_x.is_finite() || !config.resolution_y.is_finite() {
            return Err(Error::InvalidConfig("resolution must be finite".into()));
        }

        self.win_width = config.width;
        self.win_height = config.height;
        self.center = config.center;
        self.resolution_x = config.resolution_x;
        self.resolution_y = config.resolution_y;
        self.function_index = config.function_index;
        self.seed = config.seed;
        self.skip_rounds = config.skip_rounds;
        self.halt_after = config.halt_after;
        self.num_threads = config.num_threads.max(1);

        self.iteration_count = 0;
        self.escaped = 0;
        self.trapped = 0;
        self.unchanged = 0;

        let count = (self.win_width as usize) * (self.win_height as usize);
        if self.all_points.len() < count {
            self.all_points.resize(count, Point::default());
            self.scratch.resize(count, 0);
        }
        self.all_points.truncate(count);
        self.scratch.truncate(count);
        self.live.clear();
        self.live.reserve(count);

        let function = self.function();
        let x_min = self.x_min();
        let y_max = self.y_max();
        let res_x = self.resolution_x;
        let res_y = self.resolution_y;
        let half_res_x = res_x / 2.0;
        let half_res_y = res_y / 2.0;
        let width = self.win_width;

        for py in 0..self.win_height {
            let mut y = y_max - (py as f64) * res_y;
            if y.abs() < half_res_y {
                y = 0.0;
            }
            for px in 0..width {
                let mut x = x_min + (px as f64) * res_x;
                if x.abs() < half_res_x {
                    x = 0.0;
                }
                let idx = (py as usize) * (width as usize) + (px as usize);
                let point = &mut self.all_points[idx];
                function.init(point, XY::new(x, y), self.seed);
                if point.trapped {
                    self.trapped += 1;
                } else {
                    self.live.push(idx);
                }
            }
        }
        tracing::debug!(
            center_x = self.center.x,
            center_y = self.center.y,
            resolution_x = self.resolution_x,
            resolution_y = self.resolution_y,
            function = function.name(),
            "plane reset"
        );
        Ok(())
    }

    fn current_config(&self) -> PlaneConfig {
        PlaneConfig {
            width: self.win_width,
            height: self.win_height,
            center: self.center,
            resolution_x: self.resolution_x,
            resolution_y: self.resolution_y,
            function_index: self.function_index,
            seed: self.seed,
            skip_rounds: self.skip_rounds,
            halt_after: self.halt_after,
            num_threads: self.num_threads,
        }
    }

    /// Adjusts pixel dimensions. Computes a new `resolution_x` from the
    /// current x-span divided by the new width; if `preserve_ratio`,
    /// `resolution_y` is derived from the y-span, otherwise it equals the new
    /// `resolution_x`.
    pub fn resize(&mut self, width: u32, height: u32, preserve_ratio: bool) -> Result<(), Error> {
        let x_span = self.x_span();
        let y_span = self.y_span();
        let mut config = self.current_config();
        config.width = width;
        config.height = height;
        config.resolution_x = x_span / width as f64;
        config.resolution_y = if preserve_ratio {
            y_span / height as f64
        } else {
            config.resolution_x
        };
        self.reset(config)
    }

    /// Shifts the centre by an eighth of the relevant span.
    pub fn pan(&mut self, dx: i32, dy: i32) -> Result<(), Error> {
        let mut config = self.current_config();
        config.center = XY::new(
            self.center.x + dx as f64 * (self.x_span() / 8.0),
            self.center.y + dy as f64 * (self.y_span() / 8.0),
        );
        self.reset(config)
    }

    /// Multiplies both resolutions by `0.8` (zoom in) or `1.25` (zoom out).
    pub fn zoom(&mut self, zoom_in: bool) -> Result<(), Error> {
        let factor = if zoom_in { 0.8 } else { 1.25 };
        let mut config = self.current_config();
        config.resolution_x *= factor;
        config.resolution_y *= factor;
        self.reset(config)
    }

    /// Recentres on the complex coordinate of the pixel at `(px, py)`.
    pub fn recenter(&mut self, px: u32, py: u32) -> Result<(), Error> {
        let idx = (py as usize) * (self.win_width as usize) + (px as usize);
        let c = self.all_points[idx].c;
        let mut config = self.current_config();
        config.center = c;
        self.reset(config)
    }

    /// Advances to the next generator function. Switching between Mandelbrot
    /// and Julia swaps the roles of centre and seed so returning reproduces
    /// the original view (spec.md §4.2, tested by the round-trip property).
    pub fn next_function(&mut self) -> Result<(), Error> {
        let mut config = self.current_config();
        config.function_index = self.function().next().index();
        config.center = self.seed;
        config.seed = self.center;
        self.reset(config)
    }

    /// Desired number of worker threads. Note: only `iterate()`'s next call
    /// grows the pool if this exceeds its current size; shrinking the
    /// desired count does not shrink an existing pool (spec.md §9 Open
    /// Questions — the asymmetry is preserved deliberately).
    pub fn set_num_threads(&mut self, num_threads: u32) {
        self.num_threads = num_threads.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32) -> PlaneConfig {
        PlaneConfig {
            width,
            height,
            center: XY::new(-0.5, 0.0),
            resolution_x: 4.0 / width as f64,
            resolution_y: 4.0 / width as f64,
            function_index: 0,
            seed: XY::new(-1.25643, -0.381086),
            skip_rounds: 0,
            halt_after: 0,
            num_threads: 1,
        }
    }

    #[test]
    fn invariant_counts_cover_every_pixel() {
        let plane = CoordinatePlane::new(config(40, 30)).unwrap();
        assert_eq!(
            plane.escaped + plane.trapped + plane.live.len(),
            (40 * 30) as usize
        );
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let mut cfg = config(10, 10);
        cfg.resolution_x = 0.0;
        assert!(CoordinatePlane::new(cfg).is_err());
    }

    #[test]
    fn derived_rectangle_is_centered_on_center() {
        let plane = CoordinatePlane::new(config(40, 30)).unwrap();
        assert_eq!(plane.x_min() + plane.x_max(), 2.0 * plane.center.x);
        assert_eq!(plane.y_min() + plane.y_max(), 2.0 * plane.center.y);
        assert!(plane.x_max() > plane.x_min());
        assert!(plane.y_max() > plane.y_min());
    }

    #[test]
    fn reset_with_identical_arguments_is_idempotent() {
        let cfg = config(20, 20);
        let mut plane = CoordinatePlane::new(cfg).unwrap();
        let before = plane.all_points.clone();
        plane.reset(cfg).unwrap();
        assert_eq!(plane.all_points, before);
        assert_eq!(plane.iteration_count, 0);
    }

    #[test]
    fn trapped_points_never_enter_live() {
        let plane = CoordinatePlane::new(config(50, 50)).unwrap();
        for &idx in &plane.live {
            assert!(!plane.all_points[idx].trapped);
        }
        for p in &plane.all_points {
            if p.trapped {
                assert!(crate::functions::is_trapped(p.c));
            }
        }
    }

    #[test]
    fn pan_left_then_right_restores_center() {
        let mut plane = CoordinatePlane::new(config(20, 20)).unwrap();
        let original = plane.center;
        plane.pan(-1, 0).unwrap();
        plane.pan(1, 0).unwrap();
        assert!((plane.center.x - original.x).abs() < 1e-12);
        assert!((plane.center.y - original.y).abs() < 1e-12);
    }

    #[test]
    fn zoom_in_then_out_restores_resolution_exactly() {
        let mut plane = CoordinatePlane::new(config(20, 20)).unwrap();
        let original = plane.resolution_x;
        plane.zoom(true).unwrap();
        plane.zoom(false).unwrap();
        assert_eq!(plane.resolution_x, original * 0.8 * 1.25);
    }

    #[test]
    fn zoom_in_ten_times_then_out_ten_times_restores_resolution_and_center() {
        let mut plane = CoordinatePlane::new(config(20, 20)).unwrap();
        let original_res = plane.resolution_x;
        let original_center = plane.center;
        for _ in 0..10 {
            plane.zoom(true).unwrap();
        }
        for _ in 0..10 {
            plane.zoom(false).unwrap();
        }
        assert!((plane.resolution_x - original_res).abs() < 1e-9);
        assert_eq!(plane.center, original_center);
    }

    #[test]
    fn switching_function_and_back_restores_view() {
        let mut plane = CoordinatePlane::new(config(20, 20)).unwrap();
        let center = plane.center;
        let seed = plane.seed;
        let res_x = plane.resolution_x;
        plane.next_function().unwrap();
        plane.next_function().unwrap();
        assert_eq!(plane.center, center);
        assert_eq!(plane.seed, seed);
        assert_eq!(plane.resolution_x, res_x);
        assert_eq!(plane.function_index, 0);
    }
}
