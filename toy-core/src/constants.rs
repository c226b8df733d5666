//! Fixed layout constants for the handheld's address space and video
//! framebuffer. See the address-space decoder in `bus.rs` for how these
//! are used to route a CPU address to a device.

pub mod memory_range {
    /// The CPU can always see this 8000-byte slice of RAM regardless of how
    /// the bank registers are set.
    pub const RAM_FIXED_START: u16 = 0x0080;
    pub const RAM_FIXED_END: u16 = 0x1fff;

    pub const BRR_WINDOW_START: u16 = 0x2000;
    pub const BRR_WINDOW_END: u16 = 0x3fff;
    pub const PRR_WINDOW_START: u16 = 0x4000;
    pub const PRR_WINDOW_END: u16 = 0x7fff;
    pub const DRR_WINDOW_START: u16 = 0x8000;
    pub const DRR_WINDOW_END: u16 = 0xffff;

    /// The stack is hardcoded to page 1, `0x0100..=0x01ff`, addressed as
    /// `0x0100 | S`.
    pub const STACK_PAGE: u16 = 0x0100;
}

pub const RAM_SIZE: usize = 0x8000;
pub const OTP_SIZE: usize = 0x4000;
pub const FLASH_SIZE: usize = 0x200000;

pub const SCREEN_WIDTH: usize = 98;
pub const SCREEN_HEIGHT: usize = 67;

/// Fixed reset state. Unlike a real 6502, there is no vector table read on
/// reset here: `PC` and the bank registers are simply reinitialized to these
/// values (see `Emulator::reset`).
pub mod reset {
    pub const PC: u16 = 0x4000;
    pub const S: u8 = 0xff;
    pub const P: u8 = 0;
    pub const BRR: u16 = 0xe000;
    pub const PRR: u16 = 0x7202;
    pub const DRR: u16 = 0x78c0;
}
