//! The top-level device: a CPU wired to the one production `Bus`
//! implementation, plus the host-facing load/step/read-pixels API. See
//! spec.md §4.H.

use crate::bus::{Bus, System};
use crate::cpu::Cpu;
use crate::error::LoadError;
use crate::video::Video;

pub struct Emulator {
    cpu: Cpu<System>,
}

impl Emulator {
    pub fn new() -> Emulator {
        Emulator {
            cpu: Cpu::new(System::new()),
        }
    }

    /// Restores both the CPU registers and the bank registers to their
    /// power-on state. OTP, flash and RAM contents are left untouched.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.cpu.bus.reset();
    }

    pub fn load_otp(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        self.cpu.bus.load_otp(bytes)
    }

    pub fn load_flash(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        self.cpu.bus.load_flash(bytes)
    }

    /// Runs a single instruction.
    pub fn step(&mut self) {
        self.cpu.step();
    }

    /// Runs `count` instructions back to back, e.g. once per host video
    /// frame.
    pub fn run(&mut self, count: u32) {
        for _ in 0..count {
            self.cpu.step();
        }
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        self.cpu.bus.read(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.cpu.bus.write(addr, value)
    }

    pub fn video(&self) -> &Video {
        &self.cpu.bus.video
    }
}

impl Default for Emulator {
    fn default() -> Emulator {
        Emulator::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_emulator_starts_at_the_reset_vector() {
        let mut emulator = Emulator::new();
        emulator.write(0x4000, 0xea); // NOP
        emulator.step();
    }

    #[test]
    fn load_otp_rejects_the_wrong_size() {
        let mut emulator = Emulator::new();
        assert!(emulator.load_otp(&[0; 4]).is_err());
    }

    #[test]
    fn reset_leaves_memory_contents_intact() {
        let mut emulator = Emulator::new();
        emulator.write(0x0100, 0x42);
        emulator.reset();
        assert_eq!(emulator.read(0x0100), 0x42);
    }
}
