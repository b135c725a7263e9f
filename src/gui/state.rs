//! Owns the live [`CoordinatePlane`], [`Engine`], palette, pixel buffer, and
//! frame-rate controller driven by the GUI event loop.

use std::collections::HashSet;
use std::time::Instant;

use iced::keyboard::Key;
use iced::widget::canvas::Cache;

use crate::engine::Engine;
use crate::frame_rate::FrameRateController;
use crate::functions::FunctionVariant;
use crate::palette::Palette;
use crate::plane::{CoordinatePlane, PlaneConfig};

pub struct AppState {
    pub plane: CoordinatePlane,
    pub engine: Engine,
    pub palette: Palette,
    pub frame_rate: FrameRateController,
    pub pixels: Vec<u32>,
    pub cache: Cache,
    keys_down: HashSet<Key>,
    pub shutdown_requested: bool,
}

impl AppState {
    pub fn new(config: PlaneConfig) -> Self {
        let plane = CoordinatePlane::new(config).expect("valid initial configuration");
        let engine = Engine::new(plane.num_threads).expect("worker pool starts");
        let mut palette = Palette::new(plane.skip_rounds);
        palette.grow(4096);
        let pixel_count = (plane.win_width as usize) * (plane.win_height as usize);
        AppState {
            plane,
            engine,
            palette,
            frame_rate: FrameRateController::new(),
            pixels: vec![0xFF00_0000; pixel_count],
            cache: Cache::new(),
            keys_down: HashSet::new(),
            shutdown_requested: false,
        }
    }

    pub fn function_name(&self) -> &'static str {
        FunctionVariant::from_index(self.plane.function_index).name()
    }

    /// Returns `true` the first time this key transitions from up to down
    /// (edge-triggered actions per spec.md §6 "Input semantics").
    pub fn key_edge_down(&mut self, key: &Key) -> bool {
        self.keys_down.insert(key.clone())
    }

    pub fn key_up(&mut self, key: &Key) {
        self.keys_down.remove(key);
    }

    /// Advances one frame: runs the frame-rate controller's chosen step
    /// count through the engine, recolours, and invalidates the canvas cache.
    pub fn tick(&mut self) -> Result<(), crate::error::Error> {
        let steps = self.frame_rate.it_per_frame();
        let start = Instant::now();
        self.engine.iterate(&mut self.plane, steps)?;
        self.frame_rate.record_frame(start.elapsed());
        self.palette.grow(self.plane.iteration_count as usize + 1);
        crate::palette::colorize(&self.plane, &self.palette, self.engine.pool(), &mut self.pixels)?;
        self.cache.clear();
        self.frame_rate.maybe_log_throughput(self.engine.pool().size() as u32, self.plane.escaped, self.plane.live.len());
        Ok(())
    }
}
