//! A window, backed by winit + pixels, split into three small driver
//! handles sharing one window via `Rc<RefCell<_>>` — mirroring the
//! teacher's split between its window/input/render driver structs, which
//! here maps directly onto the three capability traits a windowed run
//! needs (`Keyboard` takes `&self`; `Renderer`/`Killer` take `&mut self`,
//! so one object cannot implement all three and still be borrowed
//! three ways at once in a single `exec` call).

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;

use chip8_core::capabilities::{Keyboard, Killer, Renderer};
use chip8_core::error::CResult;
use chip8_core::types::C8Byte;
use chip8_core::vm::screen::Screen;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder};
use winit_input_helper::WinitInputHelper;

use crate::pixels_driver::{PixelsRenderDriver, FRAME_HEIGHT, FRAME_WIDTH};

/// Default window title.
pub const WINDOW_TITLE: &str = "CHIP-8";

/// Host key -> CHIP-8 key, per the keyboard mapping in the design:
/// `7 8 9 0 / u i o p / j k l ; / n m , .`.
fn chip8_to_host_key(key: C8Byte) -> Option<VirtualKeyCode> {
    use VirtualKeyCode::*;
    Some(match key {
        0x1 => Key7,
        0x2 => Key8,
        0x3 => Key9,
        0xC => Key0,
        0x4 => U,
        0x5 => I,
        0x6 => O,
        0xD => P,
        0x7 => J,
        0x8 => K,
        0x9 => L,
        0xE => Semicolon,
        0xA => N,
        0x0 => M,
        0xB => Comma,
        0xF => Period,
        _ => return None,
    })
}

struct Shared {
    event_loop: EventLoop<()>,
    window: Window,
    pixels: Pixels,
    input: WinitInputHelper,
    keys_down: [bool; 16],
    should_quit: bool,
}

impl Shared {
    /// Drain pending window events without blocking, updating key state
    /// and the quit flag.
    fn pump(&mut self) {
        let input = &mut self.input;
        let keys_down = &mut self.keys_down;
        let should_quit = &mut self.should_quit;

        self.event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } = &event
            {
                *should_quit = true;
            }

            if input.update(&event) {
                if input.quit() || input.key_pressed(VirtualKeyCode::Escape) {
                    *should_quit = true;
                }
                for key in 0..16u8 {
                    if let Some(code) = chip8_to_host_key(key) {
                        if input.key_pressed(code) {
                            keys_down[key as usize] = true;
                        }
                        if input.key_released(code) {
                            keys_down[key as usize] = false;
                        }
                    }
                }
            }

            if let Event::MainEventsCleared = event {
                *control_flow = ControlFlow::Exit;
            }
        });
    }
}

/// Opens one window and hands back the three capability handles sharing
/// it. Drop all three to close the window.
pub struct WinitDriver;

impl WinitDriver {
    /// Create a window sized to the scaled CHIP-8 framebuffer and split it
    /// into its three capability handles.
    pub fn new() -> CResult<(WinitKeyboard, WinitRenderer, WinitKiller)> {
        let event_loop = EventLoop::new();
        let size = LogicalSize::new(FRAME_WIDTH, FRAME_HEIGHT);
        let window = WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(size)
            .with_min_inner_size(size)
            .build(&event_loop)?;

        let pixels = {
            let window_size = window.inner_size();
            let surface_texture =
                SurfaceTexture::new(window_size.width, window_size.height, &window);
            Pixels::new(FRAME_WIDTH, FRAME_HEIGHT, surface_texture)?
        };

        let shared = Rc::new(RefCell::new(Shared {
            event_loop,
            window,
            pixels,
            input: WinitInputHelper::new(),
            keys_down: [false; 16],
            should_quit: false,
        }));

        Ok((
            WinitKeyboard {
                shared: Rc::clone(&shared),
            },
            WinitRenderer {
                shared: Rc::clone(&shared),
            },
            WinitKiller { shared },
        ))
    }
}

/// The `Keyboard` half of a [`WinitDriver`] window.
pub struct WinitKeyboard {
    shared: Rc<RefCell<Shared>>,
}

impl Keyboard for WinitKeyboard {
    fn is_key_down(&self, key: C8Byte) -> bool {
        self.shared.borrow().keys_down[key as usize & 0xF]
    }

    fn wait_key(&self, halted: &AtomicBool) -> Option<C8Byte> {
        use std::sync::atomic::Ordering;

        loop {
            if halted.load(Ordering::Relaxed) {
                return None;
            }

            {
                let mut shared = self.shared.borrow_mut();
                shared.pump();
                if shared.should_quit {
                    return None;
                }
                for key in 0..16u8 {
                    if shared.keys_down[key as usize] {
                        return Some(key);
                    }
                }
            }

            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }
}

/// The `Renderer` half of a [`WinitDriver`] window.
pub struct WinitRenderer {
    shared: Rc<RefCell<Shared>>,
}

impl Renderer for WinitRenderer {
    fn present(&mut self, screen: &Screen) -> CResult {
        let mut shared = self.shared.borrow_mut();
        shared.pump();

        let mut blitter = PixelsRenderDriver::new(shared.pixels.get_frame());
        blitter.blit(screen);
        shared.pixels.render()?;
        shared.window.request_redraw();
        Ok(())
    }
}

/// The `Killer` half of a [`WinitDriver`] window.
pub struct WinitKiller {
    shared: Rc<RefCell<Shared>>,
}

impl Killer for WinitKiller {
    fn check(&mut self) -> bool {
        self.shared.borrow().should_quit
    }
}
