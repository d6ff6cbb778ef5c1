use std::ops::Index;
use std::ops::IndexMut;

use serde::Deserialize;
use serde::Serialize;

use crate::instruction::ArithmeticOp;
use crate::instruction::BitOp;
use crate::instruction::BitOpInner;
use crate::instruction::BitShiftOp;
use crate::instruction::Condition;
use crate::instruction::ControlOp;
use crate::instruction::HalfRegister;
use crate::instruction::Instruction;
use crate::instruction::JumpOp;
use crate::instruction::LoadAPointer;
use crate::instruction::LoadOp;
use crate::instruction::PrefixedOp;
use crate::instruction::RegOrPointer;
use crate::instruction::SomeByte;
use crate::instruction::WideReg;
use crate::instruction::WideRegWithoutSP;
use crate::mem::MemoryLikeExt;


/// The address cartridges start executing from.
pub const ENTRY_POINT: u16 = 0x0100;

#[derive(
    Debug, Default, Hash, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
#[display(
    "CPU {{ A=0x{:0>2X} F={} B=0x{:0>2X} C=0x{:0>2X} D=0x{:0>2X} E=0x{:0>2X} H=0x{:0>2X} L=0x{:0>2X} SP=0x{:0>4X} PC=0x{:0>4X} IME={} State={} }}",
    a,
    f,
    b,
    c,
    d,
    e,
    h,
    l,
    sp,
    pc,
    ime,
    state
)]
pub struct Cpu {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    /// The SP register
    pub sp: u16,
    /// The PC register
    pub pc: u16,
    /// The interrupt master enable flag. Only DI, EI and RETI touch it.
    pub ime: bool,
    /// Set by HALT and STOP. Nothing in the core clears it since interrupts are never dispatched.
    pub state: CpuState,
}

#[derive(
    Debug, Default, Hash, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
pub enum CpuState {
    #[default]
    Running,
    Halted,
    Stopped,
}

/// The F register. Only the top nibble is stored; the lower four bits always read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Flags(u8);

impl Flags {
    /// The zero flag
    pub const ZERO: u8 = 0x80;
    /// The substraction flag
    pub const SUBTRACT: u8 = 0x40;
    /// The half-carry flag
    pub const HALF_CARRY: u8 = 0x20;
    /// The full carry flag
    pub const CARRY: u8 = 0x10;

    const MASK: u8 = 0xF0;

    pub const fn from_byte(val: u8) -> Self {
        Self(val & Self::MASK)
    }

    pub const fn as_byte(&self) -> u8 {
        self.0
    }

    pub fn set_from_byte(&mut self, val: u8) {
        *self = Self::from_byte(val);
    }

    const fn get(&self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    fn set(&mut self, mask: u8, val: bool) {
        if val {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    pub const fn z(&self) -> bool {
        self.get(Self::ZERO)
    }

    pub const fn n(&self) -> bool {
        self.get(Self::SUBTRACT)
    }

    pub const fn h(&self) -> bool {
        self.get(Self::HALF_CARRY)
    }

    pub const fn c(&self) -> bool {
        self.get(Self::CARRY)
    }

    pub fn set_z(&mut self, val: bool) {
        self.set(Self::ZERO, val)
    }

    pub fn set_n(&mut self, val: bool) {
        self.set(Self::SUBTRACT, val)
    }

    pub fn set_h(&mut self, val: bool) {
        self.set(Self::HALF_CARRY, val)
    }

    pub fn set_c(&mut self, val: bool) {
        self.set(Self::CARRY, val)
    }

    fn set_all(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.set_z(z);
        self.set_n(n);
        self.set_h(h);
        self.set_c(c);
    }

    pub fn set_for_byte_shift_op(&mut self, z: bool, c: bool) {
        self.set_all(z, false, false, c);
    }
}

impl From<u8> for Flags {
    fn from(value: u8) -> Self {
        Self::from_byte(value)
    }
}

impl std::fmt::Display for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Flags(Z={} N={} H={} C={})",
            self.z() as u8,
            self.n() as u8,
            self.h() as u8,
            self.c() as u8
        )
    }
}

pub(crate) const fn check_bit(bit: u8, src: u8) -> bool {
    let bit = 0x1 << bit;
    (src & bit) == bit
}

fn addition_operation(val: &mut u8, op: u8, carry: bool, flags: &mut Flags) {
    let carry = carry as u16;
    let sum = *val as u16 + op as u16 + carry;
    let half = (*val & 0x0F) as u16 + (op & 0x0F) as u16 + carry;
    *val = sum as u8;
    flags.set_all(*val == 0, false, half > 0x0F, sum > 0xFF);
}

fn subtraction_operation(val: &mut u8, op: u8, carry: bool, flags: &mut Flags) {
    let carry = carry as i16;
    let diff = *val as i16 - op as i16 - carry;
    let half = (*val & 0x0F) as i16 - (op & 0x0F) as i16 - carry;
    *val = diff as u8;
    flags.set_all(*val == 0, true, half < 0, diff < 0);
}

/// Adds a signed offset to SP. The flags come from the unsigned add of the low byte.
fn offset_sp(sp: u16, offset: i8, flags: &mut Flags) -> u16 {
    let offset = offset as i16 as u16;
    flags.set_all(
        false,
        false,
        (sp & 0x000F) + (offset & 0x000F) > 0x000F,
        (sp & 0x00FF) + (offset & 0x00FF) > 0x00FF,
    );
    sp.wrapping_add(offset)
}

/// Takes a byte that is in standard binary representation and converts it to binary coded decimal.
fn to_bcd(mut val: u8, flags: &mut Flags) -> u8 {
    if !flags.n() {
        // after an addition, adjust if (half-)carry occurred or if result is out of bounds
        if flags.c() || val > 0x99 {
            val = val.wrapping_add(0x60);
            flags.set_c(true);
        }
        if flags.h() || (val & 0x0f) > 0x09 {
            val = val.wrapping_add(0x6);
        }
    } else {
        if flags.c() {
            val = val.wrapping_sub(0x60);
        }
        if flags.h() {
            val = val.wrapping_sub(0x6);
        }
    }
    flags.set_z(val == 0);
    flags.set_h(false);
    val
}

impl Cpu {
    /// Constructs a new CPU with each register set to 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs the CPU as a cartridge first sees it: PC at the entry point, everything else
    /// zeroed.
    pub fn at_entry_point(entry: u16) -> Self {
        Self {
            pc: entry,
            ..Self::default()
        }
    }

    pub fn flags(&self) -> &Flags {
        &self.f
    }

    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.f
    }

    /// Returns the value of the Z flag
    pub fn zero_flag(&self) -> bool {
        self.f.z()
    }

    /// Returns the value of the N flag
    pub fn subtraction_flag(&self) -> bool {
        self.f.n()
    }

    /// Returns the value of the H flag
    pub fn half_carry_flag(&self) -> bool {
        self.f.h()
    }

    /// Returns the value of the C flag
    pub fn carry_flag(&self) -> bool {
        self.f.c()
    }

    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f.as_byte()])
    }

    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_af(&mut self, val: u16) {
        let [a, f] = val.to_be_bytes();
        self.a = a;
        self.f.set_from_byte(f);
    }

    pub fn set_bc(&mut self, val: u16) {
        [self.b, self.c] = val.to_be_bytes();
    }

    pub fn set_de(&mut self, val: u16) {
        [self.d, self.e] = val.to_be_bytes();
    }

    pub fn set_hl(&mut self, val: u16) {
        [self.h, self.l] = val.to_be_bytes();
    }

    fn read_wide_reg(&self, reg: WideReg) -> u16 {
        match reg {
            WideReg::BC => self.bc(),
            WideReg::DE => self.de(),
            WideReg::HL => self.hl(),
            WideReg::SP => self.sp,
        }
    }

    fn write_wide_reg(&mut self, reg: WideReg, val: u16) {
        match reg {
            WideReg::BC => self.set_bc(val),
            WideReg::DE => self.set_de(val),
            WideReg::HL => self.set_hl(val),
            WideReg::SP => self.sp = val,
        }
    }

    fn update_wide_reg<F>(&mut self, reg: WideReg, update: F)
    where
        F: FnOnce(u16) -> u16,
    {
        let value = self.read_wide_reg(reg);
        self.write_wide_reg(reg, update(value));
    }

    pub fn read_stack_reg(&self, reg: WideRegWithoutSP) -> u16 {
        match reg {
            WideRegWithoutSP::BC => self.bc(),
            WideRegWithoutSP::DE => self.de(),
            WideRegWithoutSP::HL => self.hl(),
            WideRegWithoutSP::AF => self.af(),
        }
    }

    pub fn write_stack_reg(&mut self, reg: WideRegWithoutSP, val: u16) {
        match reg {
            WideRegWithoutSP::BC => self.set_bc(val),
            WideRegWithoutSP::DE => self.set_de(val),
            WideRegWithoutSP::HL => self.set_hl(val),
            WideRegWithoutSP::AF => self.set_af(val),
        }
    }

    /// Executes a decoded instruction.
    ///
    /// Primary handlers advance PC past their own bytes before applying their effect, so branches
    /// simply overwrite it and relative jumps are measured from the next instruction. Prefixed
    /// instructions are different: this wrapper advances PC by the two prefix bytes and
    /// [`Cpu::execute_prefixed`] leaves it alone.
    pub fn execute(&mut self, instr: Instruction, mem: &mut impl MemoryLikeExt) {
        match instr {
            Instruction::Load(op) => self.execute_load_op(op, mem),
            Instruction::ControlOp(op) => self.execute_control_op(op),
            Instruction::Jump(op) => self.execute_jump_op(op, mem),
            Instruction::Arithmetic(op) => self.execute_arithmetic_op(op, mem),
            Instruction::Prefixed(op) => {
                self.advance(2);
                self.execute_prefixed(op, mem);
            }
            Instruction::Daa => {
                self.advance(1);
                self.a = to_bcd(self.a, &mut self.f);
            }
            Instruction::Scf => {
                self.advance(1);
                self.f.set_n(false);
                self.f.set_h(false);
                self.f.set_c(true);
            }
            Instruction::Cpl => {
                self.advance(1);
                self.a = !self.a;
                self.f.set_n(true);
                self.f.set_h(true);
            }
            Instruction::Ccf => {
                self.advance(1);
                self.f.set_n(false);
                self.f.set_h(false);
                self.f.set_c(!self.f.c());
            }
            Instruction::Di => {
                self.advance(1);
                self.ime = false;
            }
            Instruction::Ei => {
                self.advance(1);
                self.ime = true;
            }
            // The accumulator rotates compute Z from the result, same as their prefixed forms.
            Instruction::Rlca => {
                self.advance(1);
                let carry = check_bit(7, self.a);
                self.a = self.a.rotate_left(1);
                self.f.set_for_byte_shift_op(self.a == 0, carry);
            }
            Instruction::Rrca => {
                self.advance(1);
                let carry = check_bit(0, self.a);
                self.a = self.a.rotate_right(1);
                self.f.set_for_byte_shift_op(self.a == 0, carry);
            }
            Instruction::Rla => {
                self.advance(1);
                let carry = check_bit(7, self.a);
                self.a = (self.a << 1) | self.f.c() as u8;
                self.f.set_for_byte_shift_op(self.a == 0, carry);
            }
            Instruction::Rra => {
                self.advance(1);
                let carry = check_bit(0, self.a);
                self.a = (self.a >> 1) | ((self.f.c() as u8) << 7);
                self.f.set_for_byte_shift_op(self.a == 0, carry);
            }
        }
    }

    /// Moves PC past `size` bytes of the instruction being executed.
    fn advance(&mut self, size: u8) {
        self.pc = self.pc.wrapping_add(size as u16);
    }

    /// Executes an operation from the 0xCB table. PC is owned by the caller.
    pub fn execute_prefixed(&mut self, op: PrefixedOp, mem: &mut impl MemoryLikeExt) {
        match op {
            PrefixedOp::BitShift(op) => self.execute_bit_shift_op(op, mem),
            PrefixedOp::Bit(op) => self.execute_bit_op(op, mem),
        }
    }

    fn execute_arithmetic_op(&mut self, op: ArithmeticOp, mem: &mut impl MemoryLikeExt) {
        self.advance(op.size());
        match op {
            ArithmeticOp::AddSP(val) => self.sp = offset_sp(self.sp, val, &mut self.f),
            ArithmeticOp::Inc16(reg) => self.update_wide_reg(reg, |value| value.wrapping_add(1)),
            ArithmeticOp::Dec16(reg) => self.update_wide_reg(reg, |value| value.wrapping_sub(1)),
            ArithmeticOp::Add16(reg) => {
                let value = self.read_wide_reg(reg);
                let hl = self.hl();
                self.f.set_n(false);
                self.f.set_h((hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
                let (hl, carry) = hl.overflowing_add(value);
                self.f.set_c(carry);
                self.set_hl(hl);
            }
            ArithmeticOp::Add(byte) => {
                let byte = self.read_some_byte(mem, byte);
                addition_operation(&mut self.a, byte, false, &mut self.f);
            }
            ArithmeticOp::Adc(byte) => {
                let byte = self.read_some_byte(mem, byte);
                let carry = self.f.c();
                addition_operation(&mut self.a, byte, carry, &mut self.f);
            }
            ArithmeticOp::Sub(byte) => {
                let byte = self.read_some_byte(mem, byte);
                subtraction_operation(&mut self.a, byte, false, &mut self.f);
            }
            ArithmeticOp::Sbc(byte) => {
                let byte = self.read_some_byte(mem, byte);
                let carry = self.f.c();
                subtraction_operation(&mut self.a, byte, carry, &mut self.f);
            }
            ArithmeticOp::And(byte) => {
                self.a &= self.read_some_byte(mem, byte);
                self.f.set_all(self.a == 0, false, true, false);
            }
            ArithmeticOp::Xor(byte) => {
                self.a ^= self.read_some_byte(mem, byte);
                self.f.set_all(self.a == 0, false, false, false);
            }
            ArithmeticOp::Or(byte) => {
                self.a |= self.read_some_byte(mem, byte);
                self.f.set_all(self.a == 0, false, false, false);
            }
            ArithmeticOp::Cp(byte) => {
                let byte = self.read_some_byte(mem, byte);
                let mut a = self.a;
                subtraction_operation(&mut a, byte, false, &mut self.f);
            }
            ArithmeticOp::Inc(reg) => {
                let mut h = false;
                let val = self.update_byte(reg, mem, |byte| {
                    h = *byte & 0x0F == 0x0F;
                    *byte = byte.wrapping_add(1);
                });
                self.f.set_z(val == 0);
                self.f.set_n(false);
                self.f.set_h(h);
            }
            ArithmeticOp::Dec(reg) => {
                let mut h = false;
                let val = self.update_byte(reg, mem, |byte| {
                    h = *byte & 0x0F == 0x00;
                    *byte = byte.wrapping_sub(1);
                });
                self.f.set_z(val == 0);
                self.f.set_n(true);
                self.f.set_h(h);
            }
        }
    }

    fn read_some_byte(&self, mem: &mut impl MemoryLikeExt, byte: SomeByte) -> u8 {
        match byte {
            SomeByte::Direct(byte) => byte,
            SomeByte::Referenced(reg) => self.copy_byte(mem, reg),
        }
    }

    pub fn copy_byte(&self, mem: &mut impl MemoryLikeExt, reg: RegOrPointer) -> u8 {
        match reg {
            RegOrPointer::Reg(reg) => self[reg],
            RegOrPointer::Pointer => mem.read_byte(self.hl()),
        }
    }

    fn update_byte(
        &mut self,
        reg: RegOrPointer,
        mem: &mut impl MemoryLikeExt,
        update: impl FnOnce(&mut u8),
    ) -> u8 {
        match reg {
            RegOrPointer::Reg(reg) => {
                update(&mut self[reg]);
                self[reg]
            }
            RegOrPointer::Pointer => mem.update_byte(self.hl(), update),
        }
    }

    /// Stores the given byte into either an (half) register or into memory using the HL register
    /// as an index.
    fn write_byte(&mut self, reg: RegOrPointer, mem: &mut impl MemoryLikeExt, val: u8) {
        match reg {
            RegOrPointer::Reg(reg) => self[reg] = val,
            RegOrPointer::Pointer => mem.write_byte(self.hl(), val),
        }
    }

    fn matches(&self, cond: Condition) -> bool {
        match cond {
            Condition::Zero => self.f.z(),
            Condition::NotZero => !self.f.z(),
            Condition::Carry => self.f.c(),
            Condition::NotCarry => !self.f.c(),
        }
    }

    /// Pushes a word. The low byte is stored first, so the high byte ends up at the lower address
    /// and SP points at it afterwards.
    pub fn push(&mut self, mem: &mut impl MemoryLikeExt, val: u16) {
        let [hi, lo] = val.to_be_bytes();
        self.sp = self.sp.wrapping_sub(1);
        mem.write_byte(self.sp, lo);
        self.sp = self.sp.wrapping_sub(1);
        mem.write_byte(self.sp, hi);
    }

    /// The inverse of [`Cpu::push`].
    pub fn pop(&mut self, mem: &mut impl MemoryLikeExt) -> u16 {
        let hi = mem.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        let lo = mem.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        u16::from_be_bytes([hi, lo])
    }

    fn call(&mut self, mem: &mut impl MemoryLikeExt, dest: u16) {
        self.push(mem, self.pc);
        self.pc = dest;
    }

    fn execute_jump_op(&mut self, op: JumpOp, mem: &mut impl MemoryLikeExt) {
        self.advance(op.size());
        match op {
            JumpOp::ConditionalRelative(cond, val) => {
                if self.matches(cond) {
                    self.pc = self.pc.wrapping_add_signed(val as i16);
                }
            }
            JumpOp::Relative(val) => self.pc = self.pc.wrapping_add_signed(val as i16),
            JumpOp::ConditionalAbsolute(cond, dest) => {
                if self.matches(cond) {
                    self.pc = dest;
                }
            }
            JumpOp::Absolute(dest) => self.pc = dest,
            JumpOp::JumpToHL => self.pc = self.hl(),
            JumpOp::Call(dest) => self.call(mem, dest),
            JumpOp::ConditionalCall(cond, dest) => {
                if self.matches(cond) {
                    self.call(mem, dest);
                }
            }
            JumpOp::Return => self.pc = self.pop(mem),
            JumpOp::ConditionalReturn(cond) => {
                if self.matches(cond) {
                    self.pc = self.pop(mem);
                }
            }
            JumpOp::ReturnAndEnable => {
                self.ime = true;
                self.pc = self.pop(mem);
            }
            JumpOp::Rst(vector) => self.call(mem, vector as u16),
        }
    }

    fn execute_control_op(&mut self, op: ControlOp) {
        self.advance(op.size());
        match op {
            ControlOp::Noop => {}
            ControlOp::Halt => self.state = CpuState::Halted,
            ControlOp::Stop => self.state = CpuState::Stopped,
        }
    }

    fn execute_bit_op(&mut self, op: BitOp, mem: &mut impl MemoryLikeExt) {
        let mask = op.mask();
        match op.op {
            BitOpInner::Bit => {
                let byte = self.copy_byte(mem, op.reg);
                self.f.set_z(byte & mask == 0);
                self.f.set_n(false);
                self.f.set_h(true);
            }
            BitOpInner::Res => {
                self.update_byte(op.reg, mem, |byte| *byte &= !mask);
            }
            BitOpInner::Set => {
                self.update_byte(op.reg, mem, |byte| *byte |= mask);
            }
        }
    }

    fn execute_bit_shift_op(&mut self, op: BitShiftOp, mem: &mut impl MemoryLikeExt) {
        let incoming = self.f.c();
        let mut carry = false;
        let byte = self.update_byte(op.target(), mem, |byte| {
            let (new, out) = op.apply(*byte, incoming);
            carry = out;
            *byte = new;
        });
        self.f.set_for_byte_shift_op(byte == 0, carry);
    }

    fn execute_load_op(&mut self, op: LoadOp, mem: &mut impl MemoryLikeExt) {
        self.advance(op.size());
        match op {
            LoadOp::Basic { dest, src } => {
                let byte = self.copy_byte(mem, src);
                self.write_byte(dest, mem, byte);
            }
            LoadOp::Direct16(reg, val) => self.write_wide_reg(reg, val),
            LoadOp::Direct(reg, val) => self.write_byte(reg, mem, val),
            LoadOp::LoadIntoA(ptr) => {
                let index = self.a_pointer(ptr);
                self.a = mem.read_byte(index);
            }
            LoadOp::StoreFromA(ptr) => {
                let index = self.a_pointer(ptr);
                mem.write_byte(index, self.a);
            }
            LoadOp::StoreSP(addr) => {
                let [hi, lo] = self.sp.to_be_bytes();
                mem.write_byte(addr, lo);
                mem.write_byte(addr.wrapping_add(1), hi);
            }
            LoadOp::HLIntoSP => self.sp = self.hl(),
            LoadOp::SPIntoHL(val) => {
                let hl = offset_sp(self.sp, val, &mut self.f);
                self.set_hl(hl);
            }
            LoadOp::Pop(reg) => {
                let val = self.pop(mem);
                self.write_stack_reg(reg, val);
            }
            LoadOp::Push(reg) => self.push(mem, self.read_stack_reg(reg)),
            LoadOp::StoreHigh(val) => mem.write_byte(u16::from_be_bytes([0xFF, val]), self.a),
            LoadOp::LoadHigh(val) => self.a = mem.read_byte(u16::from_be_bytes([0xFF, val])),
            LoadOp::Ldhca => mem.write_byte(u16::from_be_bytes([0xFF, self.c]), self.a),
            LoadOp::Ldhac => self.a = mem.read_byte(u16::from_be_bytes([0xFF, self.c])),
            LoadOp::LoadA { ptr } => self.a = mem.read_byte(ptr),
            LoadOp::StoreA { ptr } => mem.write_byte(ptr, self.a),
        }
    }

    /// Resolves the address used by the accumulator loads, stepping HL where needed.
    fn a_pointer(&mut self, ptr: LoadAPointer) -> u16 {
        match ptr {
            LoadAPointer::BC => self.bc(),
            LoadAPointer::DE => self.de(),
            LoadAPointer::Hli => {
                let digest = self.hl();
                self.set_hl(digest.wrapping_add(1));
                digest
            }
            LoadAPointer::Hld => {
                let digest = self.hl();
                self.set_hl(digest.wrapping_sub(1));
                digest
            }
        }
    }
}

impl Index<HalfRegister> for Cpu {
    type Output = u8;

    fn index(&self, index: HalfRegister) -> &Self::Output {
        match index {
            HalfRegister::A => &self.a,
            HalfRegister::B => &self.b,
            HalfRegister::C => &self.c,
            HalfRegister::D => &self.d,
            HalfRegister::E => &self.e,
            HalfRegister::H => &self.h,
            HalfRegister::L => &self.l,
        }
    }
}

impl IndexMut<HalfRegister> for Cpu {
    fn index_mut(&mut self, index: HalfRegister) -> &mut Self::Output {
        match index {
            HalfRegister::A => &mut self.a,
            HalfRegister::B => &mut self.b,
            HalfRegister::C => &mut self.c,
            HalfRegister::D => &mut self.d,
            HalfRegister::E => &mut self.e,
            HalfRegister::H => &mut self.h,
            HalfRegister::L => &mut self.l,
        }
    }
}
