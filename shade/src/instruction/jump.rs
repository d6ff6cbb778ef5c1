use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum JumpOp {
    /// Op Codes: 0x20, 0x30, 0x28, 0x38
    #[display("JR {_0}, {_1}")]
    ConditionalRelative(Condition, i8),
    /// Op Code: 0x18
    #[display("JR {_0}")]
    Relative(i8),
    /// Op Codes: 0xC2, 0xD2, 0xCA, 0xDA
    #[display("JP {_0}, 0x{_1:0>4X}")]
    ConditionalAbsolute(Condition, u16),
    /// Op Code: 0xC3
    #[display("JP 0x{_0:0>4X}")]
    Absolute(u16),
    /// Op Code: 0xE9
    #[display("JP HL")]
    JumpToHL,
    /// Op Code: 0xCD
    #[display("CALL 0x{_0:0>4X}")]
    Call(u16),
    /// Op Codes: 0xC4, 0xD4, 0xCC, 0xDC
    #[display("CALL {_0}, 0x{_1:0>4X}")]
    ConditionalCall(Condition, u16),
    /// Op Code: 0xC9
    #[display("RET")]
    Return,
    /// Op Codes: 0xC0, 0xD0, 0xC8, 0xD8
    #[display("RET {_0}")]
    ConditionalReturn(Condition),
    /// Op Code: 0xD9
    /// Return from the subroutine and enable intrupts
    #[display("RETI")]
    ReturnAndEnable,
    /// Op Codes: 0xC7, 0xCF, 0xD7, 0xDF, 0xE7, 0xEF, 0xF7, 0xFF
    /// Calls the fixed vector held by the variant.
    #[display("RST 0x{_0:0>2X}")]
    Rst(u8),
}

impl JumpOp {
    pub const fn size(&self) -> u8 {
        match self {
            JumpOp::ConditionalRelative(_, _) | JumpOp::Relative(_) => 2,
            JumpOp::ConditionalAbsolute(_, _)
            | JumpOp::Absolute(_)
            | JumpOp::Call(_)
            | JumpOp::ConditionalCall(_, _) => 3,
            JumpOp::JumpToHL
            | JumpOp::Return
            | JumpOp::ConditionalReturn(_)
            | JumpOp::ReturnAndEnable
            | JumpOp::Rst(_) => 1,
        }
    }
}
