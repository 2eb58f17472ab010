//! Host capability interfaces.
//!
//! The VM never touches a window, a physical keyboard, an audio device or
//! the wall clock directly: it calls out to these small traits instead, so
//! [`Vm`](crate::vm::cpu::Vm) stays entirely headless and unit-testable.
//! `chip8-drivers` provides the real, windowed implementations; this crate
//! only provides the null/mock implementations used by tests and by any
//! binary that does not need one of the five.

use std::sync::atomic::AtomicBool;

use crate::error::CResult;
use crate::types::C8Byte;
use crate::vm::screen::Screen;

/// The 16-key hex keypad.
pub trait Keyboard {
    /// Non-blocking level poll: is `key` currently held down?
    fn is_key_down(&self, key: C8Byte) -> bool;

    /// Block until a key is pressed, returning it. Must return promptly
    /// (with `None`) once `halted` is observed true, so a quit request can
    /// unstick an `Fx0A` that is waiting for input that will never come.
    fn wait_key(&self, halted: &AtomicBool) -> Option<C8Byte>;
}

/// The 64x32 monochrome display.
pub trait Renderer {
    /// Present the current framebuffer. Called once after every
    /// instruction; must not block longer than a display frame.
    fn present(&mut self, screen: &Screen) -> CResult;
}

/// Host quit detection (window close, Ctrl-C, etc).
pub trait Killer {
    /// Poll the host event queue. Returns `true` if the run should halt.
    fn check(&mut self) -> bool;
}

/// The single square/sine tone the sound timer gates. `Send` because the
/// timer thread, not the interpreter thread, owns the live handle during
/// `exec` (see [`crate::vm::cpu::exec`]).
pub trait Audio: Send {
    /// Turn the tone on or off. Called only on the `ST` 0<->positive edge.
    fn set_tone(&mut self, on: bool) -> CResult;
}

/// Wall-clock source for the 60 Hz timer thread.
pub trait Clock: Send {
    /// Sleep for approximately `duration`.
    fn sleep(&self, duration: std::time::Duration);
}

/// A keyboard with no keys ever down; `wait_key` returns immediately.
#[derive(Default)]
pub struct NullKeyboard;

impl Keyboard for NullKeyboard {
    fn is_key_down(&self, _key: C8Byte) -> bool {
        false
    }

    fn wait_key(&self, _halted: &AtomicBool) -> Option<C8Byte> {
        None
    }
}

/// A renderer that discards every frame.
#[derive(Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _screen: &Screen) -> CResult {
        Ok(())
    }
}

/// A killer that never requests a halt.
#[derive(Default)]
pub struct NullKiller;

impl Killer for NullKiller {
    fn check(&mut self) -> bool {
        false
    }
}

/// An audio sink that drops every tone request.
#[derive(Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn set_tone(&mut self, _on: bool) -> CResult {
        Ok(())
    }
}

/// A clock backed by the real system clock.
#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: std::time::Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that never sleeps, for tests that want the timer thread to spin
/// as fast as possible instead of tracking wall-clock time.
#[derive(Default)]
pub struct InstantClock;

impl Clock for InstantClock {
    fn sleep(&self, _duration: std::time::Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_keyboard_never_down() {
        let kb = NullKeyboard;
        assert!(!kb.is_key_down(0));
        assert_eq!(kb.wait_key(&AtomicBool::new(false)), None);
    }

    #[test]
    fn test_null_killer_never_kills() {
        let mut killer = NullKiller;
        assert!(!killer.check());
    }
}
