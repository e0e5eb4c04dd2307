//! Pixel surface access for the crash screen

pub mod framebuffer;
pub mod surface;

pub use framebuffer::{Color, Framebuffer, BACKGROUND, DEFAULT_FOREGROUND};
pub use surface::{SurfaceRef, SurfaceSlot};
