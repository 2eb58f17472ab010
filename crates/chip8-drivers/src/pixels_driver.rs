//! Blit a monochrome [`Screen`] into an RGBA frame buffer, scaling each
//! logical CHIP-8 pixel up to [`RENDERER_SCALE`] host pixels.

use chip8_core::vm::screen::{Screen, RENDERER_SCALE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Frame buffer width in host pixels.
pub const FRAME_WIDTH: u32 = (SCREEN_WIDTH * RENDERER_SCALE) as u32;
/// Frame buffer height in host pixels.
pub const FRAME_HEIGHT: u32 = (SCREEN_HEIGHT * RENDERER_SCALE) as u32;

const ON_COLOR: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const OFF_COLOR: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// A one-shot view over a `pixels::Pixels` frame, wide enough to blit a
/// single [`Screen`] into it.
pub struct PixelsRenderDriver<'a> {
    frame: &'a mut [u8],
}

impl<'a> PixelsRenderDriver<'a> {
    /// Wrap a `pixels::Pixels::get_frame()` buffer.
    pub fn new(frame: &'a mut [u8]) -> Self {
        Self { frame }
    }

    /// Blit every cell, scaled by [`RENDERER_SCALE`].
    pub fn blit(&mut self, screen: &Screen) {
        for (y, row) in screen.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                let color = if cell == 1 { ON_COLOR } else { OFF_COLOR };

                for dy in 0..RENDERER_SCALE {
                    let py = y * RENDERER_SCALE + dy;
                    let row_start = py * FRAME_WIDTH as usize * 4;
                    for dx in 0..RENDERER_SCALE {
                        let px = x * RENDERER_SCALE + dx;
                        let cursor = row_start + px * 4;
                        self.frame[cursor..cursor + 4].copy_from_slice(&color);
                    }
                }
            }
        }
    }
}
