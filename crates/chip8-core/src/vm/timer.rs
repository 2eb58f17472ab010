//! The 60 Hz delay/sound timer pair and the ticker that drives them.
//!
//! `DT` and `ST` are read by the interpreter thread (`Fx07`, `SKP`-adjacent
//! opcodes don't touch them, but `Fx15`/`Fx18` write them) and decremented
//! by a separate ticker thread; see [`run_ticker`]. Both are plain
//! [`AtomicU8`] so neither thread ever observes a torn read.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::capabilities::{Audio, Clock};
use crate::types::C8Byte;

/// One 60 Hz down-counter, shared between the interpreter and ticker
/// threads via `Arc`.
#[derive(Clone)]
pub struct Timer {
    count: Arc<AtomicU8>,
}

impl Timer {
    /// Create a timer at zero.
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicU8::new(0)),
        }
    }

    /// Current value.
    pub fn get(&self) -> C8Byte {
        self.count.load(Ordering::Relaxed)
    }

    /// Overwrite the value (used by `Fx15`/`Fx18`).
    pub fn set(&self, value: C8Byte) {
        self.count.store(value, Ordering::Relaxed);
    }

    /// Decrement by one if positive. Returns the value after decrementing,
    /// so callers can detect a positive-to-zero edge.
    fn decrement(&self) -> C8Byte {
        loop {
            let current = self.count.load(Ordering::Relaxed);
            if current == 0 {
                return 0;
            }
            let next = current - 1;
            if self
                .count
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return next;
            }
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// One ticker period: `1/60` second.
pub const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Run the 60 Hz ticker loop: decrement `dt` and `st` every tick while
/// `halted` is false, toggling `audio` on the `st` 0<->positive edge.
/// Exits as soon as `halted` becomes true.
///
/// Intended to run on its own thread, started alongside the interpreter
/// loop for the duration of one `exec` (§5 of the design).
pub fn run_ticker(
    dt: &Timer,
    st: &Timer,
    halted: &AtomicBool,
    clock: &dyn Clock,
    audio: &mut dyn Audio,
) {
    let mut sound_on = false;
    while !halted.load(Ordering::Relaxed) {
        clock.sleep(TICK);
        dt.decrement();

        // Check the 0->positive edge before decrementing: an `LD ST, Vx`
        // write lands between ticks, so by the time this tick observes it
        // ST is already positive and must sound even if this same tick
        // decrements it straight back to zero.
        if st.get() > 0 && !sound_on {
            sound_on = true;
            let _ = audio.set_tone(true);
        }

        if st.decrement() == 0 && sound_on {
            sound_on = false;
            let _ = audio.set_tone(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{InstantClock, NullAudio};

    #[test]
    fn test_decrement_stops_at_zero() {
        let timer = Timer::new();
        timer.set(1);
        assert_eq!(timer.decrement(), 0);
        assert_eq!(timer.decrement(), 0);
    }

    #[test]
    fn test_ticker_decrements_until_halted() {
        let dt = Timer::new();
        let st = Timer::new();
        dt.set(3);
        st.set(0);
        let halted = AtomicBool::new(false);
        let clock = InstantClock;
        let mut audio = NullAudio;

        // Drain dt to zero, then flip halted from inside a bespoke loop
        // mimicking what the interpreter thread would do after 3 ticks.
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..10 {
                    if dt.get() == 0 {
                        halted.store(true, Ordering::Relaxed);
                        break;
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
                halted.store(true, Ordering::Relaxed);
            });
            run_ticker(&dt, &st, &halted, &clock, &mut audio);
        });

        assert_eq!(dt.get(), 0);
    }

    #[test]
    fn test_audio_edges() {
        struct RecordingAudio {
            events: Vec<bool>,
        }
        impl Audio for RecordingAudio {
            fn set_tone(&mut self, on: bool) -> crate::error::CResult {
                self.events.push(on);
                Ok(())
            }
        }

        let dt = Timer::new();
        let st = Timer::new();
        st.set(2);
        let halted = AtomicBool::new(false);
        let clock = InstantClock;
        let mut audio = RecordingAudio { events: vec![] };

        // Manually drive two ticks then halt (avoids a data race on the
        // halted flag from a second thread for this focused assertion).
        dt.decrement();
        let mut sound_on = false;
        for _ in 0..3 {
            if st.get() > 0 && !sound_on {
                sound_on = true;
                audio.set_tone(true).unwrap();
            }
            if st.decrement() == 0 && sound_on {
                sound_on = false;
                audio.set_tone(false).unwrap();
            }
        }
        halted.store(true, Ordering::Relaxed);

        assert_eq!(audio.events, vec![true, false]);
    }
}
