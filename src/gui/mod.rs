//! The `iced`-based windowed front end (spec.md §6 graphics-surface
//! contract), driving the same [`crate::engine::Engine`] the ASCII backend
//! uses.

mod canvas;
mod file_save;
mod message;
mod state;
mod subscription;
mod update;
mod view;

use crate::error::Error;
use crate::plane::PlaneConfig;
use state::AppState;

pub fn launch(config: PlaneConfig) -> Result<(), Error> {
    iced::application("Fractal Explorer", update::update, view::view)
        .subscription(subscription::subscription)
        .run_with(move || (AppState::new(config), iced::Task::none()))
        .map_err(|e| Error::Graphics(e.to_string()))
}
