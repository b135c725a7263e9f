//! The complete set of events the GUI front end reacts to (spec.md §6,
//! "Input semantics").

use iced::keyboard::{Key, Modifiers};

#[derive(Debug, Clone)]
pub enum Message {
    /// Animation-frame tick: advance the engine and recolour.
    Tick,
    KeyDown(Key, Modifiers),
    KeyUp(Key),
    MouseClicked { x: u32, y: u32 },
    WheelUp,
    WheelDown,
    WindowResized { width: u32, height: u32 },
    SaveImageClicked,
}
