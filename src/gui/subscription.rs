//! Drives the animation tick and forwards native keyboard/window events
//! (grounded on the teacher's `gui/iced/subscription.rs` async-stream timer).

use std::time::Duration;

use iced::Subscription;

use crate::gui::message::Message;
use crate::gui::state::AppState;

pub fn subscription(_state: &AppState) -> Subscription<Message> {
    let tick = Subscription::run(|| {
        async_stream::stream! {
            let mut interval = tokio::time::interval(Duration::from_millis(16));
            loop {
                interval.tick().await;
                yield Message::Tick;
            }
        }
    });
    let keys = iced::keyboard::on_key_press(|key, modifiers| Some(Message::KeyDown(key, modifiers)));
    let key_releases = iced::keyboard::on_key_release(|key, _modifiers| Some(Message::KeyUp(key)));
    let resize = iced::window::resize_events().map(|(_id, size)| Message::WindowResized {
        width: size.width as u32,
        height: size.height as u32,
    });
    Subscription::batch([tick, keys, key_releases, resize])
}
