//! The decoded form of every LR35902 instruction. Decoding (see [`crate::lookup`]) turns raw
//! bytes into one of these variants, and the [`Cpu`](crate::cpu::Cpu) executes them.

use derive_more::From;
use derive_more::IsVariant;

mod arithmetic;
mod bit;
mod bit_shift;
mod control;
mod jump;
mod load;
mod prefixed;

pub use arithmetic::*;
pub use bit::*;
pub use bit_shift::*;
pub use control::*;
pub use jump::*;
pub use load::*;
pub use prefixed::*;

/// A fully decoded instruction, operands included.
///
/// Primary instructions own the program counter: executing one leaves PC at the next instruction
/// (or at a branch target). [`Instruction::Prefixed`] is the exception. The prefix wrapper
/// advances PC by both bytes and the inner [`PrefixedOp`] never touches it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, From, IsVariant, derive_more::Display)]
#[display("{_variant}")]
pub enum Instruction {
    #[display("{_0}")]
    Load(LoadOp),
    #[display("{_0}")]
    ControlOp(ControlOp),
    #[display("{_0}")]
    Jump(JumpOp),
    #[display("{_0}")]
    Arithmetic(ArithmeticOp),
    /// Op Code: 0xCB, followed by the secondary op code.
    #[display("{_0}")]
    Prefixed(PrefixedOp),
    /// Op Code: 0x27
    #[display("DAA")]
    #[from(skip)]
    Daa,
    /// Set Carry.
    #[display("SCF")]
    #[from(skip)]
    Scf,
    /// ComPLement accumulator.
    #[display("CPL")]
    #[from(skip)]
    Cpl,
    /// CompLement carry flag.
    #[display("CCF")]
    #[from(skip)]
    Ccf,
    /// Disable interupts
    #[display("DI")]
    #[from(skip)]
    Di,
    /// Enable interupts
    #[display("EI")]
    #[from(skip)]
    Ei,
    /// The RLA, RLCA, RRA, RRCA are, in a sense, bit shift operations. However, they are the only
    /// shifting ops that are not prefixed, so they are classified as misc.
    #[display("RLA")]
    #[from(skip)]
    Rla,
    #[display("RLCA")]
    #[from(skip)]
    Rlca,
    #[display("RRA")]
    #[from(skip)]
    Rra,
    #[display("RRCA")]
    #[from(skip)]
    Rrca,
}

impl Instruction {
    /// The number of bytes this instruction occupies in memory, op code(s) included.
    pub const fn size(&self) -> u8 {
        match self {
            Instruction::Load(op) => op.size(),
            Instruction::ControlOp(op) => op.size(),
            Instruction::Jump(op) => op.size(),
            Instruction::Arithmetic(op) => op.size(),
            Instruction::Prefixed(_) => 2,
            Instruction::Daa
            | Instruction::Scf
            | Instruction::Cpl
            | Instruction::Ccf
            | Instruction::Di
            | Instruction::Ei
            | Instruction::Rla
            | Instruction::Rlca
            | Instruction::Rra
            | Instruction::Rrca => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum HalfRegister {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// Most 8-bit operations can target either a register or the byte that HL points at.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, From, derive_more::Display)]
#[display("{_variant}")]
pub enum RegOrPointer {
    #[display("{_0}")]
    Reg(HalfRegister),
    #[display("(HL)")]
    #[from(skip)]
    Pointer,
}

/// The right-hand operand of the 8-bit ALU ops.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum SomeByte {
    /// An 8-bit literal that follows the op code.
    #[display("0x{_0:0>2X}")]
    Direct(u8),
    #[display("{_0}")]
    Referenced(RegOrPointer),
}

impl SomeByte {
    pub const fn size(&self) -> u8 {
        match self {
            SomeByte::Direct(_) => 2,
            SomeByte::Referenced(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum WideReg {
    BC,
    DE,
    HL,
    SP,
}

/// The pairs that can be pushed to or popped from the stack.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum WideRegWithoutSP {
    BC,
    DE,
    HL,
    AF,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum Condition {
    #[display("Z")]
    Zero,
    #[display("NZ")]
    NotZero,
    #[display("C")]
    Carry,
    #[display("NC")]
    NotCarry,
}
