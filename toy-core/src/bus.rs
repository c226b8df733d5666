//! The address-space decoder. Translates a 16-bit CPU address plus the
//! three bank registers into a `(device, offset, is_ram)` triple and
//! dispatches the actual read/write, per spec.md §4.F.
//!
//! `Bus` is the capability spec.md §9's design note asks for: the CPU holds
//! a value that offers `read`/`write`, rather than reaching through an
//! opaque pointer with C-style function-pointer callbacks. `System` is the
//! one production implementation; tests substitute a small in-memory
//! double (see `cpu.rs`'s test module).

use crate::constants::{memory_range, FLASH_SIZE, OTP_SIZE, RAM_SIZE};
use crate::error::LoadError;
use crate::video::Video;

pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
}

/// Is `addr` inside the `[0x0080, 0x1fff]` slice that is always RAM
/// regardless of bank register state?
fn is_fixed_ram(addr: u16) -> bool {
    (memory_range::RAM_FIXED_START..=memory_range::RAM_FIXED_END).contains(&addr)
}

pub struct System {
    pub ram: Box<[u8; RAM_SIZE]>,
    pub brr: u16,
    pub prr: u16,
    pub drr: u16,
    pub otp: Box<[u8; OTP_SIZE]>,
    pub flash: Box<[u8; FLASH_SIZE]>,
    /// Open bus: the most recently returned byte, supplied to addresses
    /// that do not decode to any device.
    pub last_read: u8,
    pub video: Video,
}

/// Which device a banked (non-fixed-RAM) address routed to, and the
/// fully-resolved `(bank, offset)` used to get there.
enum Device {
    Ram { address: u16 },
    Otp { offset: usize },
    Video,
    Flash { address: usize },
    Undecoded,
}

impl System {
    pub fn new() -> System {
        System {
            ram: Box::new([0; RAM_SIZE]),
            brr: crate::constants::reset::BRR,
            prr: crate::constants::reset::PRR,
            drr: crate::constants::reset::DRR,
            otp: Box::new([0; OTP_SIZE]),
            flash: Box::new([0; FLASH_SIZE]),
            last_read: 0,
            video: Video::new(),
        }
    }

    pub fn reset(&mut self) {
        self.brr = crate::constants::reset::BRR;
        self.prr = crate::constants::reset::PRR;
        self.drr = crate::constants::reset::DRR;
    }

    pub fn load_otp(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() != OTP_SIZE {
            return Err(LoadError::UnexpectedSize {
                expected: OTP_SIZE,
                actual: bytes.len(),
            });
        }
        self.otp.copy_from_slice(bytes);
        tracing::info!(bytes = bytes.len(), "loaded OTP image");
        Ok(())
    }

    pub fn load_flash(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > FLASH_SIZE {
            return Err(LoadError::UnexpectedSize {
                expected: FLASH_SIZE,
                actual: bytes.len(),
            });
        }
        // Shorter files leave the tail zero, so clear first.
        self.flash.fill(0);
        self.flash[..bytes.len()].copy_from_slice(bytes);
        if bytes.len() < FLASH_SIZE {
            tracing::info!(
                bytes = bytes.len(),
                capacity = FLASH_SIZE,
                "loaded flash image (tail zero-filled)"
            );
        } else {
            tracing::info!(bytes = bytes.len(), "loaded flash image");
        }
        Ok(())
    }

    /// Resolves the device, offset and RAM-ness for a windowed (i.e.
    /// non-fixed-RAM) address. `is_ram` is read off the *unshifted* bank
    /// register, per spec.md §4.F step 3 — the shift used to build `bank`
    /// below would otherwise lose bit 15.
    fn decode_window(&self, addr: u16) -> Device {
        let (bank_register, bank, offset) = if addr < memory_range::RAM_FIXED_START {
            // Below the fixed-RAM window and below any bank window: the
            // original (`miuchiz.c`) leaves bank/is_ram/offset all zero for
            // these addresses rather than matching them to BRR/PRR/DRR, so
            // `(bank & 0x9e00) == 0` routes them to OTP offset 0.
            (0u16, 0u16, 0u16)
        } else if (memory_range::BRR_WINDOW_START..=memory_range::BRR_WINDOW_END).contains(&addr) {
            (self.brr, self.brr, addr & 0x1fff)
        } else if (memory_range::PRR_WINDOW_START..=memory_range::PRR_WINDOW_END).contains(&addr) {
            (self.prr, (self.prr << 1) & 0x7fff, addr & 0x3fff)
        } else {
            debug_assert!(
                (memory_range::DRR_WINDOW_START..=memory_range::DRR_WINDOW_END).contains(&addr)
            );
            (self.drr, (self.drr << 2) & 0x7fff, addr & 0x7fff)
        };

        if bank_register & 0x8000 != 0 {
            // Windowed RAM aliases the same 32 KiB array the fixed region
            // addresses directly (spec.md §9's open question, resolved
            // this way because the original C source indexes a single
            // `hw->ram[0x8000]` array from both paths).
            return Device::Ram { address: addr };
        }

        if (bank & 0x9e00) == 0x0000 || (bank & 0x9e00) == 0x1e00 {
            let offset = ((bank & 1) as usize) * 8192 + offset as usize;
            Device::Otp {
                offset: offset & 0x3fff,
            }
        } else if (bank & 0x9f00) == 0x0300 {
            Device::Video
        } else if (bank & 0x9c00) == 0x0400 {
            let address = ((bank & 0xff) as usize) * 8192 + offset as usize;
            Device::Flash {
                address: address & 0x1fffff,
            }
        } else {
            Device::Undecoded
        }
    }
}

impl Bus for System {
    fn read(&mut self, addr: u16) -> u8 {
        if is_fixed_ram(addr) {
            let value = self.ram[addr as usize];
            self.last_read = value;
            return value;
        }

        let value = match self.decode_window(addr) {
            Device::Ram { address } => self.ram[(address & 0x7fff) as usize],
            Device::Otp { offset } => self.otp[offset],
            Device::Video => self.video.read(addr),
            Device::Flash { address } => self.flash[address],
            Device::Undecoded => {
                tracing::debug!(addr, "read from undecoded bank region, returning open bus");
                self.last_read
            }
        };
        self.last_read = value;
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        if is_fixed_ram(addr) {
            self.ram[addr as usize] = value;
            return;
        }

        match self.decode_window(addr) {
            Device::Ram { address } => self.ram[(address & 0x7fff) as usize] = value,
            Device::Otp { .. } => {
                // Writes to OTP are silently dropped.
            }
            Device::Video => self.video.write(addr, value),
            Device::Flash { .. } => {
                // Writes to flash are silently dropped in this model.
            }
            Device::Undecoded => {
                tracing::debug!(addr, "write to undecoded bank region, dropped");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::reset;

    #[test]
    fn fixed_ram_round_trips() {
        let mut system = System::new();
        system.write(0x0100, 0x42);
        assert_eq!(system.read(0x0100), 0x42);
    }

    #[test]
    fn fixed_ram_read_updates_open_bus() {
        let mut system = System::new();
        system.write(0x1000, 0x99);
        system.read(0x1000);
        assert_eq!(system.last_read, 0x99);
    }

    #[test]
    fn addresses_below_the_fixed_ram_window_decode_to_otp_bank_zero() {
        let mut system = System::new();
        system.otp[0] = 0xab;
        // Below 0x0080: neither fixed RAM nor any bank window. Bank
        // registers are irrelevant here since this region never consults
        // them; the reset defaults are left untouched to prove that.
        assert_eq!(system.read(0x0000), 0xab);
        assert_eq!(system.read(0x007f), 0xab);
        // Writes are dropped, same as any other OTP write.
        system.write(0x0010, 0xff);
        assert_eq!(system.otp[0], 0xab);
    }

    #[test]
    fn prr_window_maps_to_ram_when_high_bit_set() {
        let mut system = System::new();
        // PRR defaults to 0x7202, whose bit 15 is clear; force it RAM-backed.
        system.prr = 0x8000;
        system.write(0x4000, 0x55);
        assert_eq!(system.read(0x4000), 0x55);
        // Aliases the same RAM array addressed directly.
        assert_eq!(system.ram[0x4000], 0x55);
    }

    #[test]
    fn otp_writes_are_dropped() {
        let mut system = System::new();
        system.otp[0] = 0xab;
        // Bit 15 clear (ROM-backed) and bank & 0x9e00 == 0x0000 lands on
        // OTP at the window's base.
        system.brr = 0x0000;
        system.write(0x2000, 0xff);
        assert_eq!(system.otp[0], 0xab);
        assert_eq!(system.read(0x2000), 0xab);
    }

    #[test]
    fn flash_writes_are_dropped_and_reads_come_from_the_flash_image() {
        let mut system = System::new();
        // DRR defaults to 0x78c0: (0x78c0 << 2) & 0x7fff == 0x4300 is not
        // quite what we want for a clean flash test, so pick a DRR value
        // that lands squarely in the flash bank-match window.
        system.drr = 0x0100; // shifted: (0x0100 << 2) & 0x7fff = 0x0400
        system.flash[0] = 0x11;
        system.write(0x8000, 0xff);
        assert_eq!(system.flash[0], 0x11);
        assert_eq!(system.read(0x8000), 0x11);
    }

    #[test]
    fn undecoded_region_reads_open_bus_and_drops_writes() {
        let mut system = System::new();
        system.brr = 0x0a00; // bank & 0x9e00 == 0x0a00: matches none of the patterns.
        system.last_read = 0x77;
        assert_eq!(system.read(0x2000), 0x77);
        system.write(0x2000, 0x99);
        assert_eq!(system.last_read, 0x77);
    }

    #[test]
    fn load_otp_requires_exact_size() {
        let mut system = System::new();
        assert!(system.load_otp(&[0; OTP_SIZE]).is_ok());
        assert!(system.load_otp(&[0; 10]).is_err());
    }

    #[test]
    fn load_flash_zero_fills_the_tail_of_a_short_image() {
        let mut system = System::new();
        system.flash[100] = 0xff;
        system.load_flash(&[1, 2, 3]).unwrap();
        assert_eq!(&system.flash[..3], &[1, 2, 3]);
        assert_eq!(system.flash[100], 0);
    }

    #[test]
    fn load_flash_rejects_oversized_images() {
        let mut system = System::new();
        assert!(system.load_flash(&vec![0; FLASH_SIZE + 1]).is_err());
    }

    #[test]
    fn reset_restores_bank_registers() {
        let mut system = System::new();
        system.brr = 0;
        system.prr = 0;
        system.drr = 0;
        system.reset();
        assert_eq!(system.brr, reset::BRR);
        assert_eq!(system.prr, reset::PRR);
        assert_eq!(system.drr, reset::DRR);
    }
}
