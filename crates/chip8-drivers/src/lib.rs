//! Windowed host drivers for the CHIP-8 capability traits: a winit+pixels
//! renderer/keyboard/killer and a cpal+usfx audio sink. `chip8-core` stays
//! headless; this crate is the only place that opens a window or an
//! audio device.

mod pixels_driver;
mod usfx_driver;
mod winit_driver;

pub use pixels_driver::PixelsRenderDriver;
pub use usfx_driver::UsfxAudioDriver;
pub use winit_driver::{WinitDriver, WINDOW_TITLE};
