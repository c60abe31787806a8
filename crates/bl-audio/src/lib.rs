//! Audio backends for the beatlab drum machine.
//!
//! A backend owns the device clock and the render [`Engine`](bl_engine::Engine);
//! the host only schedules voice commands against its clock.

mod cpal_backend;
mod offline;
mod traits;

pub use cpal_backend::CpalBackend;
pub use offline::OfflineBackend;
pub use traits::{AudioBackend, AudioError};
