use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum LoadOp {
    /// Used for opcodes in 0x40..0x80, minus 0x76 (HALT)
    #[display("LD {dest}, {src}")]
    Basic {
        dest: RegOrPointer,
        src: RegOrPointer,
    },
    /// Used for opcodes 0x_1 in 0x00..0x40
    #[display("LD {_0}, 0x{_1:0>4X}")]
    Direct16(WideReg, u16),
    /// Used for opcodes 0x_6 and 0x_E in 0x00..0x40
    #[display("LD {_0}, 0x{_1:0>2X}")]
    Direct(RegOrPointer, u8),
    /// Used for opcodes 0x0A, 0x1A, 0x2A, 0x3A
    #[display("LD A, ({_0})")]
    LoadIntoA(LoadAPointer),
    /// Used for opcodes 0x02, 0x12, 0x22, 0x32
    #[display("LD ({_0}), A")]
    StoreFromA(LoadAPointer),
    /// Opcode: 0x08
    /// Store SP & $FF at address n16 and SP >> 8 at address n16 + 1.
    #[display("LD (0x{_0:0>4X}), SP")]
    StoreSP(u16),
    /// Opcode: 0xF9
    #[display("LD SP, HL")]
    HLIntoSP,
    /// Opcode: 0xF8
    /// Add the signed value e8 to SP and store the result in HL.
    #[display("LD HL, SP + {_0}")]
    SPIntoHL(i8),
    /// Used for opcodes 0xC1, 0xD1, 0xE1, 0xF1
    #[display("POP {_0}")]
    Pop(WideRegWithoutSP),
    /// Used for opcodes 0xC5, 0xD5, 0xE5, 0xF5
    #[display("PUSH {_0}")]
    Push(WideRegWithoutSP),
    /// Used for opcode 0xE0. Writes A to 0xFF00 + n.
    #[display("LDH (0xFF{_0:0>2X}), A")]
    StoreHigh(u8),
    /// Used for opcode 0xF0. Reads 0xFF00 + n into A.
    #[display("LDH A, (0xFF{_0:0>2X})")]
    LoadHigh(u8),
    /// Used for opcode 0xE2. Writes A to 0xFF00 + C.
    #[display("LDH (C), A")]
    Ldhca,
    /// Used for opcode 0xF2. Reads 0xFF00 + C into A.
    #[display("LDH A, (C)")]
    Ldhac,
    /// Used for opcode 0xFA
    #[display("LD A, (0x{ptr:0>4X})")]
    LoadA { ptr: u16 },
    /// Used for opcode 0xEA
    #[display("LD (0x{ptr:0>4X}), A")]
    StoreA { ptr: u16 },
}

/// The pointers usable by the accumulator load/store ops. The HL forms increment or decrement HL
/// after the access.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum LoadAPointer {
    BC,
    DE,
    #[display("HL+")]
    Hli,
    #[display("HL-")]
    Hld,
}

impl LoadOp {
    pub const fn size(&self) -> u8 {
        match self {
            LoadOp::Direct16(_, _)
            | LoadOp::StoreSP(_)
            | LoadOp::LoadA { .. }
            | LoadOp::StoreA { .. } => 3,
            LoadOp::Direct(_, _)
            | LoadOp::SPIntoHL(_)
            | LoadOp::StoreHigh(_)
            | LoadOp::LoadHigh(_) => 2,
            LoadOp::Basic { .. }
            | LoadOp::LoadIntoA(_)
            | LoadOp::StoreFromA(_)
            | LoadOp::HLIntoSP
            | LoadOp::Pop(_)
            | LoadOp::Push(_)
            | LoadOp::Ldhca
            | LoadOp::Ldhac => 1,
        }
    }
}
