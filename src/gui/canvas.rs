//! Draws the coloured pixel buffer onto the Iced canvas (grounded on the
//! teacher's `gui/iced/fract_canvas.rs` `draw_image`/`Handle::from_rgba` use).

use iced::mouse;
use iced::widget::canvas::{self, Event, Geometry};
use iced::widget::image::Handle;
use iced::{Rectangle, Renderer, Theme};

use crate::gui::message::Message;
use crate::gui::state::AppState;

pub struct FractalCanvas<'a> {
    state: &'a AppState,
}

impl<'a> FractalCanvas<'a> {
    pub fn new(state: &'a AppState) -> Self {
        FractalCanvas { state }
    }

    fn rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.state.pixels.len() * 4);
        for argb in &self.state.pixels {
            let [a, r, g, b] = argb.to_be_bytes();
            bytes.extend_from_slice(&[r, g, b, a]);
        }
        bytes
    }
}

impl<'a> canvas::Program<Message> for FractalCanvas<'a> {
    type State = ();

    fn draw(&self, _state: &(), renderer: &Renderer, _theme: &Theme, bounds: Rectangle, _cursor: iced::mouse::Cursor) -> Vec<Geometry> {
        let geometry = self.state.cache.draw(renderer, bounds.size(), |frame| {
            let handle = Handle::from_rgba(self.state.plane.win_width, self.state.plane.win_height, self.rgba_bytes());
            let image = canvas::Image::new(handle);
            frame.draw_image(bounds, image);
        });
        vec![geometry]
    }

    fn update(
        &self,
        _state: &mut (),
        event: Event,
        bounds: Rectangle,
        cursor: iced::mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    let x = (position.x as u32).min(self.state.plane.win_width.saturating_sub(1));
                    let y = (position.y as u32).min(self.state.plane.win_height.saturating_sub(1));
                    (canvas::event::Status::Captured, Some(Message::MouseClicked { x, y }))
                } else {
                    (canvas::event::Status::Ignored, None)
                }
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let amount = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                if amount > 0.0 {
                    (canvas::event::Status::Captured, Some(Message::WheelUp))
                } else if amount < 0.0 {
                    (canvas::event::Status::Captured, Some(Message::WheelDown))
                } else {
                    (canvas::event::Status::Ignored, None)
                }
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }
}
