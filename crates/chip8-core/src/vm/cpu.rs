//! The virtual machine: register/memory/stack state, the fetch/decode/
//! execute loop, and the two-thread `exec` driver that runs it alongside
//! the 60 Hz timer ticker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capabilities::{Audio, Clock, Keyboard, Killer, Renderer};
use crate::error::{BadInstruction, CResult, MemoryAccessError};
use crate::font::glyph_addr;
use crate::rng::Random;
use crate::types::{C8Addr, C8Byte};

use super::memory::{Memory, MEMORY_SIZE, PROGRAM_START};
use super::opcodes::{decode, OpCode};
use super::registers::Registers;
use super::screen::Screen;
use super::stack::Stack;
use super::timer::{run_ticker, Timer};

/// A fully self-contained CHIP-8 machine: memory, registers, stack,
/// framebuffer, timers and a per-VM PRNG. Headless by construction — all
/// host interaction goes through the capability traits passed to [`step`]
/// and [`exec`].
pub struct Vm {
    registers: Registers,
    memory: Memory,
    stack: Stack,
    screen: Screen,
    pc: C8Addr,
    dt: Timer,
    st: Timer,
    halted: Arc<AtomicBool>,
    rng: Random,
}

impl Vm {
    /// Load `rom` at [`PROGRAM_START`] and prepare to execute from there,
    /// seeding the PRNG from OS entropy.
    pub fn new(rom: &[C8Byte]) -> Self {
        Self::with_rng(rom, Random::new())
    }

    /// Like [`Vm::new`], but with a deterministic PRNG seed (the `--seed`
    /// CLI flag threads through to here).
    pub fn with_seed(rom: &[C8Byte], seed: u64) -> Self {
        Self::with_rng(rom, Random::from_seed(seed))
    }

    fn with_rng(rom: &[C8Byte], rng: Random) -> Self {
        let mut memory = Memory::new();
        memory.load_rom(rom);

        Self {
            registers: Registers::new(),
            memory,
            stack: Stack::new(),
            screen: Screen::new(),
            pc: PROGRAM_START,
            dt: Timer::new(),
            st: Timer::new(),
            halted: Arc::new(AtomicBool::new(false)),
            rng,
        }
    }

    /// Current program counter.
    pub fn pc(&self) -> C8Addr {
        self.pc
    }

    /// The register file, for inspection (tests, a future debugger).
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// The framebuffer.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The call stack.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The delay timer.
    pub fn dt(&self) -> &Timer {
        &self.dt
    }

    /// The sound timer.
    pub fn st(&self) -> &Timer {
        &self.st
    }

    /// Whether the machine has halted (EXIT, a fatal error, or an
    /// externally requested kill).
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }

    /// Run exactly one fetch/decode/execute cycle. Returns `Ok(true)` if
    /// the machine should keep running, `Ok(false)` if it has halted
    /// cleanly (EXIT, or the keyboard capability observed a kill request
    /// mid-`Fx0A`). A fatal condition (out-of-range PC, bad instruction,
    /// stack over/underflow, an out-of-range memory access) halts the
    /// machine and returns `Err`.
    pub fn step(&mut self, keyboard: &dyn Keyboard) -> CResult<bool> {
        if self.is_halted() || self.pc as usize + 2 > MEMORY_SIZE {
            self.halted.store(true, Ordering::Relaxed);
            return Ok(false);
        }

        let opcode = self.memory.fetch_word(self.pc);
        self.pc += 2;

        match self.execute(decode(opcode), keyboard) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.halted.store(true, Ordering::Relaxed);
                Ok(false)
            }
            Err(err) => {
                self.halted.store(true, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    fn execute(&mut self, op: OpCode, keyboard: &dyn Keyboard) -> CResult<bool> {
        match op {
            OpCode::CLS => self.screen.clear(),
            OpCode::RET => self.pc = self.stack.pop()?,
            OpCode::EXIT => return Ok(false),

            OpCode::JP(addr) => self.pc = self.guard_addr(addr)?,
            OpCode::CALL(addr) => {
                self.stack.push(self.pc)?;
                self.pc = self.guard_addr(addr)?;
            }

            OpCode::SEByte(x, kk) => {
                if self.registers.get(x) == kk {
                    self.pc += 2;
                }
            }
            OpCode::SNEByte(x, kk) => {
                if self.registers.get(x) != kk {
                    self.pc += 2;
                }
            }
            OpCode::SE(x, y) => {
                if self.registers.get(x) == self.registers.get(y) {
                    self.pc += 2;
                }
            }
            OpCode::SNE(x, y) => {
                if self.registers.get(x) != self.registers.get(y) {
                    self.pc += 2;
                }
            }

            OpCode::LDByte(x, kk) => self.registers.set(x, kk),
            OpCode::ADDByte(x, kk) => {
                let v = self.registers.get(x).wrapping_add(kk);
                self.registers.set(x, v);
            }
            OpCode::LD(x, y) => self.registers.set(x, self.registers.get(y)),

            OpCode::OR(x, y) => {
                let v = self.registers.get(x) | self.registers.get(y);
                self.registers.set(x, v);
            }
            OpCode::AND(x, y) => {
                let v = self.registers.get(x) & self.registers.get(y);
                self.registers.set(x, v);
            }
            OpCode::XOR(x, y) => {
                let v = self.registers.get(x) ^ self.registers.get(y);
                self.registers.set(x, v);
            }
            OpCode::ADD(x, y) => {
                let (vx, vy) = (self.registers.get(x), self.registers.get(y));
                let sum = u16::from(vx) + u16::from(vy);
                self.registers.set(x, (sum & 0xFF) as C8Byte);
                self.registers.set_flag((sum > 0xFF) as C8Byte);
            }
            OpCode::SUB(x, y) => {
                let (vx, vy) = (self.registers.get(x), self.registers.get(y));
                self.registers.set(x, vx.wrapping_sub(vy));
                self.registers.set_flag((vx > vy) as C8Byte);
            }
            OpCode::SHR(x, _) => {
                let vx = self.registers.get(x);
                self.registers.set(x, vx >> 1);
                self.registers.set_flag(vx & 1);
            }
            OpCode::SUBN(x, y) => {
                let (vx, vy) = (self.registers.get(x), self.registers.get(y));
                self.registers.set(x, vy.wrapping_sub(vx));
                self.registers.set_flag((vy > vx) as C8Byte);
            }
            OpCode::SHL(x, _) => {
                let vx = self.registers.get(x);
                self.registers.set(x, vx << 1);
                self.registers.set_flag((vx >> 7) & 1);
            }

            OpCode::LDI(addr) => self.registers.set_i(addr),
            OpCode::JP0(addr) => {
                let target = addr + C8Addr::from(self.registers.get(0));
                if (target as usize) < PROGRAM_START as usize {
                    return Err(Box::new(MemoryAccessError {
                        addr: target,
                        reason: "jump target below the program region".to_string(),
                    }));
                }
                self.pc = self.guard_addr(target)?;
            }
            OpCode::RND(x, kk) => {
                let v = self.rng.next_byte() & kk;
                self.registers.set(x, v);
            }

            OpCode::DRW(x, y, n) => {
                let (vx, vy) = (self.registers.get(x), self.registers.get(y));
                let sprite = self.memory.read_slice_checked(self.registers.i(), n as usize)?;
                let collision = self.screen.draw_sprite(vx, vy, sprite);
                self.registers.set_flag(collision as C8Byte);
            }

            OpCode::SKP(x) => {
                if keyboard.is_key_down(self.registers.get(x)) {
                    self.pc += 2;
                }
            }
            OpCode::SKNP(x) => {
                if !keyboard.is_key_down(self.registers.get(x)) {
                    self.pc += 2;
                }
            }

            OpCode::LDGetDelayTimer(x) => self.registers.set(x, self.dt.get()),
            OpCode::LDGetKey(x) => match keyboard.wait_key(&self.halted) {
                Some(key) => self.registers.set(x, key),
                None => return Ok(false),
            },
            OpCode::LDSetDelayTimer(x) => self.dt.set(self.registers.get(x)),
            OpCode::LDSetSoundTimer(x) => self.st.set(self.registers.get(x)),
            OpCode::ADDI(x) => {
                let i = self.registers.i().wrapping_add(C8Addr::from(self.registers.get(x)));
                self.registers.set_i(i);
            }
            OpCode::LDSprite(x) => self.registers.set_i(glyph_addr(self.registers.get(x))),
            OpCode::LDBCD(x) => {
                let v = self.registers.get(x);
                let i = self.registers.i();
                self.memory.write_byte(i, v / 100)?;
                self.memory.write_byte(i.wrapping_add(1), (v / 10) % 10)?;
                self.memory.write_byte(i.wrapping_add(2), v % 10)?;
            }
            OpCode::LDS(x) => {
                let i = self.registers.i();
                for reg in 0..=x {
                    let addr = i.wrapping_add(C8Addr::from(reg));
                    self.memory.write_byte(addr, self.registers.get(reg))?;
                }
            }
            OpCode::LDR(x) => {
                let i = self.registers.i();
                for reg in 0..=x {
                    let addr = i.wrapping_add(C8Addr::from(reg));
                    let v = self.memory.read_byte_checked(addr)?;
                    self.registers.set(reg, v);
                }
            }

            OpCode::EMPTY | OpCode::DATA(_) => {
                return Err(Box::new(BadInstruction(format!(
                    "unrecognized opcode at {:04X}",
                    self.pc - 2
                ))));
            }
        }

        Ok(true)
    }

    fn guard_addr(&self, addr: C8Addr) -> CResult<C8Addr> {
        if addr as usize >= MEMORY_SIZE {
            return Err(Box::new(MemoryAccessError {
                addr,
                reason: "jump target outside addressable memory".to_string(),
            }));
        }
        Ok(addr)
    }
}

/// Run `vm` to completion, driving the interpreter loop on the calling
/// thread while a second thread ticks `DT`/`ST` at 60 Hz and gates audio.
/// Returns once the machine halts (`EXIT`, a killer request, or a fatal
/// instruction error, which is propagated).
pub fn exec(
    vm: &mut Vm,
    keyboard: &dyn Keyboard,
    renderer: &mut dyn Renderer,
    killer: &mut dyn Killer,
    audio: &mut dyn Audio,
    clock: &dyn Clock,
) -> CResult {
    let dt = vm.dt.clone();
    let st = vm.st.clone();
    let halted = Arc::clone(&vm.halted);

    std::thread::scope(|scope| -> CResult {
        scope.spawn(move || {
            run_ticker(&dt, &st, &halted, clock, audio);
        });

        loop {
            if vm.is_halted() {
                break;
            }

            match vm.step(keyboard) {
                Ok(true) => {}
                Ok(false) => {
                    vm.halted.store(true, Ordering::Relaxed);
                    break;
                }
                Err(err) => {
                    vm.halted.store(true, Ordering::Relaxed);
                    return Err(err);
                }
            }

            renderer.present(vm.screen())?;

            if killer.check() {
                vm.halted.store(true, Ordering::Relaxed);
                break;
            }
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::NullKeyboard;

    #[test]
    fn test_ld_and_jp_loop() {
        let rom = [0x60, 0x05, 0x12, 0x00];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        for _ in 0..4 {
            vm.step(&keyboard).unwrap();
        }

        assert_eq!(vm.registers().get(0), 0x05);
        assert_eq!(vm.pc(), PROGRAM_START);
    }

    #[test]
    fn test_draw_single_pixel() {
        // LD V0,0 / LD V1,0 / LD I,0x20A / DRW V0,V1,1 / EXIT / .SB 0x80
        let rom = [
            0x60, 0x00, 0x61, 0x00, 0xA2, 0x0A, 0xD0, 0x11, 0x00, 0xFD, 0x80,
        ];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        loop {
            match vm.step(&keyboard).unwrap() {
                true => {}
                false => break,
            }
        }

        assert_eq!(vm.screen().get(0, 0), 1);
        assert_eq!(vm.screen().get(1, 0), 0);
        assert_eq!(vm.registers().get(0xF), 0);
    }

    #[test]
    fn test_drw_collision_on_redraw() {
        // Same sprite drawn twice before exiting.
        let rom = [
            0x60, 0x00, 0x61, 0x00, 0xA2, 0x0C, 0xD0, 0x11, 0xD0, 0x11, 0x00, 0xFD, 0x80,
        ];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        loop {
            match vm.step(&keyboard).unwrap() {
                true => {}
                false => break,
            }
        }

        assert_eq!(vm.screen().get(0, 0), 0);
        assert_eq!(vm.registers().get(0xF), 1);
    }

    #[test]
    fn test_bcd() {
        let rom = [0x62, 123, 0xA3, 0x00, 0xF2, 0x33];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        for _ in 0..3 {
            vm.step(&keyboard).unwrap();
        }

        assert_eq!(vm.registers().i(), 0x300);
    }

    #[test]
    fn test_skip_on_equal() {
        // LD V0, 0x42 / SE V0, 0x42 / LD V0, 0x01 / LD V0, 0x02
        let rom = [0x60, 0x42, 0x30, 0x42, 0x60, 0x01, 0x60, 0x02];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        for _ in 0..3 {
            vm.step(&keyboard).unwrap();
        }

        assert_eq!(vm.registers().get(0), 0x02);
    }

    #[test]
    fn test_unknown_opcode_is_fatal() {
        let rom = [0x50, 0x01];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        assert!(vm.step(&keyboard).is_err());
        assert!(vm.is_halted());
    }

    #[test]
    fn test_drw_out_of_bounds_i_errors_instead_of_panicking() {
        // LD I, 0xFFF / DRW V0, V0, 15 — I is never bounded to [0, 4096),
        // so a sprite read starting at the very top of memory must be
        // rejected, not index past the end of the backing array.
        let rom = [0xA0, 0xFF, 0xD0, 0x0F];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        vm.step(&keyboard).unwrap();
        assert!(vm.step(&keyboard).is_err());
    }

    #[test]
    fn test_ldr_out_of_bounds_i_errors_instead_of_panicking() {
        // LD I, 0xFFF / LD V1, [I] — reads V0 and V1 from I and I+1; I+1
        // falls outside addressable memory.
        let rom = [0xA0, 0xFF, 0xF1, 0x65];
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        vm.step(&keyboard).unwrap();
        assert!(vm.step(&keyboard).is_err());
    }

    #[test]
    fn test_stack_discipline_seventeenth_call_aborts() {
        // CALL 0x200 seventeen times in a row, from a program that starts
        // at 0x200 itself (every CALL re-enters the same subroutine). The
        // 16-deep stack accepts the first 16 and overflows on the 17th.
        let mut rom = Vec::new();
        for _ in 0..17 {
            rom.push(0x22);
            rom.push(0x00);
        }
        let mut vm = Vm::with_seed(&rom, 0);
        let keyboard = NullKeyboard;

        for _ in 0..16 {
            assert!(vm.step(&keyboard).unwrap());
        }
        assert!(vm.step(&keyboard).is_err());
    }
}
