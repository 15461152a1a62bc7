//! Time subsystem.
//!
//! Provides frame timing and redraw pacing without coupling to the runtime.
//! The runtime owns one `FrameClock`, waits for `next_deadline()` and calls
//! `tick()` once per drawn frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
