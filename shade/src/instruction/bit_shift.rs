use super::*;

/// The prefixed rotates and shifts. The accumulator-only forms (RLCA and friends) live on
/// [`Instruction`] since they are not prefixed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum BitShiftOp {
    #[display("RLC {_0}")]
    Rlc(RegOrPointer),
    #[display("RRC {_0}")]
    Rrc(RegOrPointer),
    #[display("RL {_0}")]
    Rl(RegOrPointer),
    #[display("RR {_0}")]
    Rr(RegOrPointer),
    #[display("SLA {_0}")]
    Sla(RegOrPointer),
    #[display("SRA {_0}")]
    Sra(RegOrPointer),
    #[display("SWAP {_0}")]
    Swap(RegOrPointer),
    #[display("SRL {_0}")]
    Srl(RegOrPointer),
}

impl BitShiftOp {
    /// The register, or `(HL)`, that the operation rewrites.
    pub const fn target(&self) -> RegOrPointer {
        match *self {
            BitShiftOp::Rlc(reg)
            | BitShiftOp::Rrc(reg)
            | BitShiftOp::Rl(reg)
            | BitShiftOp::Rr(reg)
            | BitShiftOp::Sla(reg)
            | BitShiftOp::Sra(reg)
            | BitShiftOp::Swap(reg)
            | BitShiftOp::Srl(reg) => reg,
        }
    }

    /// Shifts `byte`, feeding in `carry` where the operation rotates through it. Returns the new
    /// byte and the bit that was shifted out.
    pub const fn apply(&self, byte: u8, carry: bool) -> (u8, bool) {
        let carry = carry as u8;
        let high = byte & 0x80 != 0;
        let low = byte & 0x01 != 0;
        match self {
            BitShiftOp::Rlc(_) => (byte.rotate_left(1), high),
            BitShiftOp::Rrc(_) => (byte.rotate_right(1), low),
            BitShiftOp::Rl(_) => ((byte << 1) | carry, high),
            BitShiftOp::Rr(_) => ((byte >> 1) | (carry << 7), low),
            BitShiftOp::Sla(_) => (byte << 1, high),
            BitShiftOp::Sra(_) => ((byte >> 1) | (byte & 0x80), low),
            BitShiftOp::Swap(_) => (byte.rotate_left(4), false),
            BitShiftOp::Srl(_) => (byte >> 1, low),
        }
    }
}
