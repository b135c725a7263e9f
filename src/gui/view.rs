//! Top-level layout: the fractal canvas plus a status line.

use iced::widget::{canvas, column, text};
use iced::{Element, Length};

use crate::gui::canvas::FractalCanvas;
use crate::gui::message::Message;
use crate::gui::state::AppState;

pub fn view(state: &AppState) -> Element<'_, Message> {
    let status = text(format!(
        "{} | iteration {} | escaped: {} not: {} | threads {}",
        state.function_name(),
        state.plane.iteration_count,
        state.plane.escaped,
        state.plane.trapped + state.plane.live.len(),
        state.plane.num_threads,
    ));
    let canvas_widget = canvas(FractalCanvas::new(state)).width(Length::Fill).height(Length::Fill);
    column![canvas_widget, status].into()
}
