//! Central message handler (spec.md §6 "Input semantics").

use iced::keyboard::key::Named;
use iced::keyboard::{Key, Modifiers};
use iced::Task;

use crate::gui::message::Message;
use crate::gui::state::AppState;

fn is_quit(key: &Key) -> bool {
    matches!(key, Key::Named(Named::Escape)) || matches!(key, Key::Character(c) if c.as_str() == "q")
}

fn is_next_function(key: &Key) -> bool {
    matches!(key, Key::Named(Named::Space))
}

fn is_save(key: &Key, modifiers: Modifiers) -> bool {
    modifiers.control() && matches!(key, Key::Character(c) if c.as_str() == "s")
}

pub fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::Tick => {
            if let Err(e) = state.tick() {
                tracing::error!(error = %e, "frame tick failed");
            }
        }
        Message::KeyDown(key, modifiers) => {
            if is_quit(&key) {
                state.shutdown_requested = true;
                return iced::exit();
            } else if is_save(&key, modifiers) {
                return Task::done(Message::SaveImageClicked);
            } else if is_next_function(&key) {
                let _ = state.plane.next_function();
            } else if state.key_edge_down(&key) {
                apply_edge_key(state, &key);
            }
        }
        Message::KeyUp(key) => state.key_up(&key),
        Message::MouseClicked { x, y } => {
            let _ = state.plane.recenter(x, y);
        }
        Message::WheelUp => {
            let _ = state.plane.zoom(true);
        }
        Message::WheelDown => {
            let _ = state.plane.zoom(false);
        }
        Message::WindowResized { width, height } => {
            let _ = state.plane.resize(width, height, true);
            state.pixels = vec![0xFF00_0000; (width as usize) * (height as usize)];
            state.cache.clear();
        }
        Message::SaveImageClicked => {
            if let Some(path) = crate::gui::file_save::show_save_file_dialog() {
                crate::gui::file_save::write_image_png(&path, state.plane.win_width, state.plane.win_height, &state.pixels);
            }
        }
    }
    Task::none()
}

fn apply_edge_key(state: &mut AppState, key: &Key) {
    match key {
        Key::Character(c) if c.as_str() == "w" => {
            let _ = state.plane.pan(0, 1);
        }
        Key::Named(Named::ArrowUp) => {
            let _ = state.plane.pan(0, 1);
        }
        Key::Character(c) if c.as_str() == "s" => {
            let _ = state.plane.pan(0, -1);
        }
        Key::Named(Named::ArrowDown) => {
            let _ = state.plane.pan(0, -1);
        }
        Key::Character(c) if c.as_str() == "a" => {
            let _ = state.plane.pan(-1, 0);
        }
        Key::Named(Named::ArrowLeft) => {
            let _ = state.plane.pan(-1, 0);
        }
        Key::Character(c) if c.as_str() == "d" => {
            let _ = state.plane.pan(1, 0);
        }
        Key::Named(Named::ArrowRight) => {
            let _ = state.plane.pan(1, 0);
        }
        Key::Character(c) if c.as_str() == "z" => {
            let _ = state.plane.zoom(true);
        }
        Key::Named(Named::PageDown) => {
            let _ = state.plane.zoom(true);
        }
        Key::Character(c) if c.as_str() == "x" => {
            let _ = state.plane.zoom(false);
        }
        Key::Named(Named::PageUp) => {
            let _ = state.plane.zoom(false);
        }
        Key::Character(c) if c.as_str() == "m" => {
            state.plane.set_num_threads(state.plane.num_threads + 1);
        }
        Key::Character(c) if c.as_str() == "n" => {
            state.plane.set_num_threads(state.plane.num_threads.saturating_sub(1).max(1));
        }
        _ => {}
    }
}
