//! Op code decoding.
//!
//! An [`OpTable`] is built once per engine and never mutated afterwards. Each primary slot holds a
//! [`Template`] describing how many operand bytes follow the op code and how to build the final
//! [`Instruction`] from them. The secondary (0xCB) table holds finished [`PrefixedOp`]s since none
//! of them carry operands.

use derive_more::Display;
use derive_more::Error;

use crate::instruction::*;
use crate::mem::MemoryLike;

/// The op code that switches decoding over to the secondary table.
pub const PREFIX_OP_CODE: u8 = 0xCB;

/// How a primary op code becomes an instruction.
#[derive(Clone, Copy)]
pub enum Template {
    /// The op code alone is the instruction.
    Ready(Instruction),
    /// One operand byte follows the op code.
    WithByte(fn(u8) -> Instruction),
    /// A little-endian 16-bit operand follows the op code.
    WithWord(fn(u16) -> Instruction),
    /// The next byte is an op code in the secondary table.
    Prefix,
}

/// The decoder found nothing at `pc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display(
    "no instruction for {}op code 0x{opcode:0>2X} @ 0x{pc:0>4X}",
    if *prefixed { "prefixed " } else { "" }
)]
pub struct UnmappedOpcode {
    pub opcode: u8,
    pub prefixed: bool,
    pub pc: u16,
}

#[derive(Clone)]
pub struct OpTable {
    primary: [Option<Template>; 256],
    prefixed: [Option<PrefixedOp>; 256],
}

impl Default for OpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OpTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mapped = self.primary.iter().filter(|t| t.is_some()).count();
        f.debug_struct("OpTable")
            .field("primary", &mapped)
            .field("prefixed", &self.prefixed.len())
            .finish()
    }
}

impl OpTable {
    pub fn new() -> Self {
        Self {
            primary: std::array::from_fn(|op| primary_template(op as u8)),
            prefixed: std::array::from_fn(|op| Some(prefixed_op(op as u8))),
        }
    }

    /// Returns the template for a primary op code, if one exists.
    pub fn template(&self, opcode: u8) -> Option<Template> {
        self.primary[opcode as usize]
    }

    /// Returns the operation for a secondary (0xCB-prefixed) op code, if one exists.
    pub fn prefixed(&self, opcode: u8) -> Option<PrefixedOp> {
        self.prefixed[opcode as usize]
    }

    /// Decodes the instruction that starts at `pc`, reading operand bytes through the bus.
    pub fn decode<M: MemoryLike + ?Sized>(
        &self,
        mem: &mut M,
        pc: u16,
    ) -> Result<Instruction, UnmappedOpcode> {
        let opcode = mem.read_byte(pc);
        let template = self.template(opcode).ok_or(UnmappedOpcode {
            opcode,
            prefixed: false,
            pc,
        })?;
        let instr = match template {
            Template::Ready(instr) => instr,
            Template::WithByte(build) => build(mem.read_byte(pc.wrapping_add(1))),
            Template::WithWord(build) => {
                let lo = mem.read_byte(pc.wrapping_add(1));
                let hi = mem.read_byte(pc.wrapping_add(2));
                build(u16::from_le_bytes([lo, hi]))
            }
            Template::Prefix => {
                let opcode = mem.read_byte(pc.wrapping_add(1));
                let op = self.prefixed(opcode).ok_or(UnmappedOpcode {
                    opcode,
                    prefixed: true,
                    pc,
                })?;
                Instruction::Prefixed(op)
            }
        };
        Ok(instr)
    }
}

/// Maps the three-bit register field used throughout the instruction set.
const fn reg_or_pointer(bits: u8) -> RegOrPointer {
    match bits & 0x07 {
        0 => RegOrPointer::Reg(HalfRegister::B),
        1 => RegOrPointer::Reg(HalfRegister::C),
        2 => RegOrPointer::Reg(HalfRegister::D),
        3 => RegOrPointer::Reg(HalfRegister::E),
        4 => RegOrPointer::Reg(HalfRegister::H),
        5 => RegOrPointer::Reg(HalfRegister::L),
        6 => RegOrPointer::Pointer,
        _ => RegOrPointer::Reg(HalfRegister::A),
    }
}

const fn wide_reg(bits: u8) -> WideReg {
    match bits & 0x03 {
        0 => WideReg::BC,
        1 => WideReg::DE,
        2 => WideReg::HL,
        _ => WideReg::SP,
    }
}

const fn stack_reg(bits: u8) -> WideRegWithoutSP {
    match bits & 0x03 {
        0 => WideRegWithoutSP::BC,
        1 => WideRegWithoutSP::DE,
        2 => WideRegWithoutSP::HL,
        _ => WideRegWithoutSP::AF,
    }
}

const fn condition(bits: u8) -> Condition {
    match bits & 0x03 {
        0 => Condition::NotZero,
        1 => Condition::Zero,
        2 => Condition::NotCarry,
        _ => Condition::Carry,
    }
}

const fn load_a_pointer(bits: u8) -> LoadAPointer {
    match bits & 0x03 {
        0 => LoadAPointer::BC,
        1 => LoadAPointer::DE,
        2 => LoadAPointer::Hli,
        _ => LoadAPointer::Hld,
    }
}

/// Builds the ALU op selected by bits 3-5 of op codes in 0x80..0xC0 (and their immediate forms).
const fn alu_op(bits: u8, byte: SomeByte) -> ArithmeticOp {
    match bits & 0x07 {
        0 => ArithmeticOp::Add(byte),
        1 => ArithmeticOp::Adc(byte),
        2 => ArithmeticOp::Sub(byte),
        3 => ArithmeticOp::Sbc(byte),
        4 => ArithmeticOp::And(byte),
        5 => ArithmeticOp::Xor(byte),
        6 => ArithmeticOp::Or(byte),
        _ => ArithmeticOp::Cp(byte),
    }
}

fn ready(instr: impl Into<Instruction>) -> Template {
    Template::Ready(instr.into())
}

/// Decodes a primary op code into its template. The op code is split into the usual `x`, `y`, `z`
/// fields (bits 6-7, 3-5, and 0-2 respectively), with `p` and `q` splitting `y` further.
fn primary_template(op: u8) -> Option<Template> {
    let x = op >> 6;
    let y = (op >> 3) & 0x07;
    let z = op & 0x07;
    let p = y >> 1;
    let q = y & 0x01;
    let template = match (x, z) {
        (0, 0) => match y {
            0 => ready(ControlOp::Noop),
            1 => Template::WithWord(|addr| LoadOp::StoreSP(addr).into()),
            2 => Template::WithByte(|_| ControlOp::Stop.into()),
            3 => Template::WithByte(|off| JumpOp::Relative(off as i8).into()),
            4 => Template::WithByte(|off| {
                JumpOp::ConditionalRelative(Condition::NotZero, off as i8).into()
            }),
            5 => Template::WithByte(|off| {
                JumpOp::ConditionalRelative(Condition::Zero, off as i8).into()
            }),
            6 => Template::WithByte(|off| {
                JumpOp::ConditionalRelative(Condition::NotCarry, off as i8).into()
            }),
            _ => Template::WithByte(|off| {
                JumpOp::ConditionalRelative(Condition::Carry, off as i8).into()
            }),
        },
        (0, 1) if q == 0 => match p {
            0 => Template::WithWord(|val| LoadOp::Direct16(WideReg::BC, val).into()),
            1 => Template::WithWord(|val| LoadOp::Direct16(WideReg::DE, val).into()),
            2 => Template::WithWord(|val| LoadOp::Direct16(WideReg::HL, val).into()),
            _ => Template::WithWord(|val| LoadOp::Direct16(WideReg::SP, val).into()),
        },
        (0, 1) => ready(ArithmeticOp::Add16(wide_reg(p))),
        (0, 2) if q == 0 => ready(LoadOp::StoreFromA(load_a_pointer(p))),
        (0, 2) => ready(LoadOp::LoadIntoA(load_a_pointer(p))),
        (0, 3) if q == 0 => ready(ArithmeticOp::Inc16(wide_reg(p))),
        (0, 3) => ready(ArithmeticOp::Dec16(wide_reg(p))),
        (0, 4) => ready(ArithmeticOp::Inc(reg_or_pointer(y))),
        (0, 5) => ready(ArithmeticOp::Dec(reg_or_pointer(y))),
        (0, 6) => match y {
            0 => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(0), val).into()),
            1 => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(1), val).into()),
            2 => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(2), val).into()),
            3 => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(3), val).into()),
            4 => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(4), val).into()),
            5 => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(5), val).into()),
            6 => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(6), val).into()),
            _ => Template::WithByte(|val| LoadOp::Direct(reg_or_pointer(7), val).into()),
        },
        (0, _) => match y {
            0 => ready(Instruction::Rlca),
            1 => ready(Instruction::Rrca),
            2 => ready(Instruction::Rla),
            3 => ready(Instruction::Rra),
            4 => ready(Instruction::Daa),
            5 => ready(Instruction::Cpl),
            6 => ready(Instruction::Scf),
            _ => ready(Instruction::Ccf),
        },
        // LD (HL), (HL) is where HALT lives
        (1, 6) if y == 6 => ready(ControlOp::Halt),
        (1, _) => ready(LoadOp::Basic {
            dest: reg_or_pointer(y),
            src: reg_or_pointer(z),
        }),
        (2, _) => ready(alu_op(y, SomeByte::Referenced(reg_or_pointer(z)))),
        (3, 0) => match y {
            0..=3 => ready(JumpOp::ConditionalReturn(condition(y))),
            4 => Template::WithByte(|n| LoadOp::StoreHigh(n).into()),
            5 => Template::WithByte(|off| ArithmeticOp::AddSP(off as i8).into()),
            6 => Template::WithByte(|n| LoadOp::LoadHigh(n).into()),
            _ => Template::WithByte(|off| LoadOp::SPIntoHL(off as i8).into()),
        },
        (3, 1) if q == 0 => ready(LoadOp::Pop(stack_reg(p))),
        (3, 1) => match p {
            0 => ready(JumpOp::Return),
            1 => ready(JumpOp::ReturnAndEnable),
            2 => ready(JumpOp::JumpToHL),
            _ => ready(LoadOp::HLIntoSP),
        },
        (3, 2) => match y {
            0 => Template::WithWord(|addr| {
                JumpOp::ConditionalAbsolute(Condition::NotZero, addr).into()
            }),
            1 => Template::WithWord(|addr| {
                JumpOp::ConditionalAbsolute(Condition::Zero, addr).into()
            }),
            2 => Template::WithWord(|addr| {
                JumpOp::ConditionalAbsolute(Condition::NotCarry, addr).into()
            }),
            3 => Template::WithWord(|addr| {
                JumpOp::ConditionalAbsolute(Condition::Carry, addr).into()
            }),
            4 => ready(LoadOp::Ldhca),
            5 => Template::WithWord(|ptr| LoadOp::StoreA { ptr }.into()),
            6 => ready(LoadOp::Ldhac),
            _ => Template::WithWord(|ptr| LoadOp::LoadA { ptr }.into()),
        },
        (3, 3) => match y {
            0 => Template::WithWord(|addr| JumpOp::Absolute(addr).into()),
            1 => Template::Prefix,
            6 => ready(Instruction::Di),
            7 => ready(Instruction::Ei),
            // 0xD3, 0xDB, 0xE3, 0xEB
            _ => return None,
        },
        (3, 4) => match y {
            0 => Template::WithWord(|addr| {
                JumpOp::ConditionalCall(Condition::NotZero, addr).into()
            }),
            1 => Template::WithWord(|addr| JumpOp::ConditionalCall(Condition::Zero, addr).into()),
            2 => Template::WithWord(|addr| {
                JumpOp::ConditionalCall(Condition::NotCarry, addr).into()
            }),
            3 => Template::WithWord(|addr| {
                JumpOp::ConditionalCall(Condition::Carry, addr).into()
            }),
            // 0xE4, 0xEC, 0xF4, 0xFC
            _ => return None,
        },
        (3, 5) if q == 0 => ready(LoadOp::Push(stack_reg(p))),
        (3, 5) if p == 0 => Template::WithWord(|addr| JumpOp::Call(addr).into()),
        // 0xDD, 0xED, 0xFD
        (3, 5) => return None,
        (3, 6) => match y {
            0 => Template::WithByte(|val| ArithmeticOp::Add(SomeByte::Direct(val)).into()),
            1 => Template::WithByte(|val| ArithmeticOp::Adc(SomeByte::Direct(val)).into()),
            2 => Template::WithByte(|val| ArithmeticOp::Sub(SomeByte::Direct(val)).into()),
            3 => Template::WithByte(|val| ArithmeticOp::Sbc(SomeByte::Direct(val)).into()),
            4 => Template::WithByte(|val| ArithmeticOp::And(SomeByte::Direct(val)).into()),
            5 => Template::WithByte(|val| ArithmeticOp::Xor(SomeByte::Direct(val)).into()),
            6 => Template::WithByte(|val| ArithmeticOp::Or(SomeByte::Direct(val)).into()),
            _ => Template::WithByte(|val| ArithmeticOp::Cp(SomeByte::Direct(val)).into()),
        },
        _ => ready(JumpOp::Rst(y * 8)),
    };
    Some(template)
}

/// Decodes a secondary op code. Every one of the 256 values is a real operation.
fn prefixed_op(op: u8) -> PrefixedOp {
    let y = (op >> 3) & 0x07;
    let reg = reg_or_pointer(op);
    let bit_op = |op: BitOpInner| -> PrefixedOp { BitOp { bit: y, reg, op }.into() };
    match op >> 6 {
        0 => match y {
            0 => BitShiftOp::Rlc(reg),
            1 => BitShiftOp::Rrc(reg),
            2 => BitShiftOp::Rl(reg),
            3 => BitShiftOp::Rr(reg),
            4 => BitShiftOp::Sla(reg),
            5 => BitShiftOp::Sra(reg),
            6 => BitShiftOp::Swap(reg),
            _ => BitShiftOp::Srl(reg),
        }
        .into(),
        1 => bit_op(BitOpInner::Bit),
        2 => bit_op(BitOpInner::Res),
        _ => bit_op(BitOpInner::Set),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNUSED: [u8; 11] = [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ];

    fn decode_bytes(table: &OpTable, bytes: &[u8]) -> Result<Instruction, UnmappedOpcode> {
        let mut mem = vec![0u8; 0x10000];
        mem[..bytes.len()].copy_from_slice(bytes);
        table.decode(&mut mem, 0)
    }

    #[test]
    fn only_the_unused_op_codes_are_unmapped() {
        let table = OpTable::new();
        for op in 0..=u8::MAX {
            assert_eq!(
                table.template(op).is_none(),
                UNUSED.contains(&op),
                "Op code 0x{op:0>2X}"
            );
        }
    }

    #[test]
    fn decoded_sizes_match_operand_templates() {
        let table = OpTable::new();
        for op in (0..=u8::MAX).filter(|op| !UNUSED.contains(op)) {
            let instr = decode_bytes(&table, &[op, 0x00, 0x00]).unwrap();
            let expected = match table.template(op).unwrap() {
                Template::Ready(_) => 1,
                Template::WithByte(_) | Template::Prefix => 2,
                Template::WithWord(_) => 3,
            };
            assert_eq!(instr.size(), expected, "{instr} from 0x{op:0>2X}");
        }
    }

    #[test]
    fn sixteen_bit_operands_are_little_endian() {
        let table = OpTable::new();
        let instr = decode_bytes(&table, &[0xC3, 0x50, 0x01]).unwrap();
        assert_eq!(instr, Instruction::Jump(JumpOp::Absolute(0x0150)));
        let instr = decode_bytes(&table, &[0x31, 0xFE, 0xFF]).unwrap();
        let expected = LoadOp::Direct16(WideReg::SP, 0xFFFE);
        assert_eq!(instr, Instruction::Load(expected));
    }

    #[test]
    fn known_op_codes() {
        let table = OpTable::new();
        let cases: &[(&[u8], Instruction)] = &[
            (&[0x00], ControlOp::Noop.into()),
            (&[0x07], Instruction::Rlca),
            (&[0x0F], Instruction::Rrca),
            (
                &[0x3E, 0x42],
                LoadOp::Direct(HalfRegister::A.into(), 0x42).into(),
            ),
            (
                &[0x55],
                LoadOp::Basic {
                    dest: HalfRegister::D.into(),
                    src: HalfRegister::L.into(),
                }
                .into(),
            ),
            (&[0x76], ControlOp::Halt.into()),
            (&[0xE0, 0x40], LoadOp::StoreHigh(0x40).into()),
            (&[0xEA, 0x00, 0xC0], LoadOp::StoreA { ptr: 0xC000 }.into()),
            (&[0xFA, 0x00, 0xC0], LoadOp::LoadA { ptr: 0xC000 }.into()),
            (&[0xF3], Instruction::Di),
            (&[0xFF], JumpOp::Rst(0x38).into()),
            (&[0x18, 0x80], JumpOp::Relative(-128).into()),
            (
                &[0x36, 0x11],
                LoadOp::Direct(RegOrPointer::Pointer, 0x11).into(),
            ),
            (&[0xE9], JumpOp::JumpToHL.into()),
            (
                &[0xFE, 0x10],
                ArithmeticOp::Cp(SomeByte::Direct(0x10)).into(),
            ),
            (
                &[0xAF],
                ArithmeticOp::Xor(SomeByte::Referenced(HalfRegister::A.into())).into(),
            ),
            (&[0xF5], LoadOp::Push(WideRegWithoutSP::AF).into()),
            (&[0x39], ArithmeticOp::Add16(WideReg::SP).into()),
        ];
        for (bytes, expected) in cases {
            let instr = decode_bytes(&table, bytes).unwrap();
            assert_eq!(instr, *expected, "{bytes:02X?}");
        }
    }

    #[test]
    fn prefixed_table_is_complete() {
        let table = OpTable::new();
        assert!((0..=u8::MAX).all(|op| table.prefixed(op).is_some()));
        assert_eq!(
            table.prefixed(0x7E),
            Some(PrefixedOp::Bit(BitOp {
                bit: 7,
                reg: RegOrPointer::Pointer,
                op: BitOpInner::Bit,
            }))
        );
        let swap_a = PrefixedOp::BitShift(BitShiftOp::Swap(HalfRegister::A.into()));
        assert_eq!(table.prefixed(0x37), Some(swap_a));
        assert_eq!(
            table.prefixed(0xC0),
            Some(PrefixedOp::Bit(BitOp {
                bit: 0,
                reg: HalfRegister::B.into(),
                op: BitOpInner::Set,
            }))
        );
    }

    #[test]
    fn unmapped_op_code_reports_location() {
        let table = OpTable::new();
        let mut mem = vec![0u8; 0x10000];
        mem[0x0200] = 0xDD;
        let err = table.decode(&mut mem, 0x0200).unwrap_err();
        assert_eq!(
            err,
            UnmappedOpcode {
                opcode: 0xDD,
                prefixed: false,
                pc: 0x0200,
            }
        );
    }

    #[test]
    fn table_instances_are_independent_and_equal() {
        let a = OpTable::new();
        let b = OpTable::new();
        for op in 0..=u8::MAX {
            let mut mem = vec![0u8; 0x10000];
            mem[0] = op;
            assert_eq!(a.decode(&mut mem, 0), b.decode(&mut mem, 0));
        }
    }
}
