//! Micro-ops: pure register/flag mutators. Each one is handed an already
//! fetched operand byte and never touches memory or `PC` itself — the
//! addressing mode and dispatch code (`cpu.rs`) are responsible for getting
//! the operand and, for read-modify-write instructions, writing the result
//! back. See spec.md §4.C.

use crate::bus::Bus;
use crate::cpu::Cpu;

pub fn ora<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    cpu.a |= value;
    cpu.flags.update_nz(cpu.a);
}

pub fn and<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    cpu.a &= value;
    cpu.flags.update_nz(cpu.a);
}

pub fn eor<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    cpu.a ^= value;
    cpu.flags.update_nz(cpu.a);
}

pub fn lda<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    cpu.a = value;
    cpu.flags.update_nz(cpu.a);
}

pub fn ldx<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    cpu.x = value;
    cpu.flags.update_nz(cpu.x);
}

pub fn ldy<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    cpu.y = value;
    cpu.flags.update_nz(cpu.y);
}

pub fn bit<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    cpu.flags.update_bit(cpu.a, value);
}

pub fn cmp<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    let a = cpu.a;
    cpu.flags.compare(a, value);
}

pub fn cpx<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    let x = cpu.x;
    cpu.flags.compare(x, value);
}

pub fn cpy<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    let y = cpu.y;
    cpu.flags.compare(y, value);
}

/// Binary (non-decimal) add-with-carry, shared by `adc` and (inverted) by
/// `sbc`.
fn adc_binary<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    let carry = cpu.flags.carry() as u16;
    let sum = cpu.a as u16 + value as u16 + carry;
    let result = sum as u8;

    cpu.flags.set_carry(sum > 0xff);
    let overflow = (!(cpu.a ^ value) & (cpu.a ^ result) & 0x80) != 0;
    cpu.flags.set_overflow(overflow);
    cpu.a = result;
    cpu.flags.update_nz(cpu.a);
}

/// BCD add-with-carry, per spec.md §4.C: operate nibble-wise with decimal
/// carry, not binary carry.
fn adc_decimal<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    let a = cpu.a;
    let carry = cpu.flags.carry() as u16;

    let mut low = (a as u16 & 0x0f) + (value as u16 & 0x0f) + carry;
    if low > 9 {
        low += 6;
    }

    let mut high = (a as u16 & 0xf0) + (value as u16 & 0xf0) + low;

    // Overflow uses the signed high-nibble sum before the >=0xa0 correction
    // below, the same shape as the binary overflow test above.
    let overflow = (!(a ^ value) & (a ^ (high as u8)) & 0x80) != 0;

    if high >= 0xa0 {
        high += 0x60;
    }

    cpu.flags.set_carry(high > 0xff);
    cpu.flags.set_overflow(overflow);
    cpu.a = ((high & 0xf0) | (low & 0x0f)) as u8;
    cpu.flags.update_nz(cpu.a);
}

pub fn adc<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    if cpu.flags.decimal() {
        adc_decimal(cpu, value);
    } else {
        adc_binary(cpu, value);
    }
}

/// SBC is ADC with the operand's bits inverted, per spec.md §4.C — this
/// holds in both binary and decimal mode.
pub fn sbc<B: Bus>(cpu: &mut Cpu<B>, value: u8) {
    adc(cpu, value ^ 0xff);
}
