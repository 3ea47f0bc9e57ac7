//! Keyboard and mouse state for the samples.
//!
//! The public API does not expose winit types; the runtime translates window
//! events into [`InputEvent`]s and feeds them to [`InputState::apply_event`].

mod event;
mod state;
pub(crate) mod winit;

pub use event::{ButtonState, InputEvent, Key, MouseButton};
pub use state::{InputFrame, InputState};
