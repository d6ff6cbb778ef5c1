use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum ArithmeticOp {
    /// Op Codes: 0x80..=0x87, 0xC6
    #[display("ADD A, {_0}")]
    Add(SomeByte),
    /// Op Codes: 0x09, 0x19, 0x29, 0x39
    #[display("ADD HL, {_0}")]
    Add16(WideReg),
    /// Op Code: 0xE8
    #[display("ADD SP, {_0}")]
    AddSP(i8),
    /// Op Codes: 0x88..=0x8F, 0xCE
    #[display("ADC A, {_0}")]
    Adc(SomeByte),
    /// Op Codes: 0x90..=0x97, 0xD6
    #[display("SUB A, {_0}")]
    Sub(SomeByte),
    /// Op Codes: 0x98..=0x9F, 0xDE
    #[display("SBC A, {_0}")]
    Sbc(SomeByte),
    /// Op Codes: 0xA0..=0xA7, 0xE6
    #[display("AND A, {_0}")]
    And(SomeByte),
    /// Op Codes: 0xA8..=0xAF, 0xEE
    #[display("XOR A, {_0}")]
    Xor(SomeByte),
    /// Op Codes: 0xB0..=0xB7, 0xF6
    #[display("OR A, {_0}")]
    Or(SomeByte),
    /// Op Codes: 0xB8..=0xBF, 0xFE
    #[display("CP A, {_0}")]
    Cp(SomeByte),
    /// Op Codes: 0x_4 and 0x_C in 0x00..0x40
    #[display("INC {_0}")]
    Inc(RegOrPointer),
    /// Op Codes: 0x03, 0x13, 0x23, 0x33
    #[display("INC {_0}")]
    Inc16(WideReg),
    /// Op Codes: 0x_5 and 0x_D in 0x00..0x40
    #[display("DEC {_0}")]
    Dec(RegOrPointer),
    /// Op Codes: 0x0B, 0x1B, 0x2B, 0x3B
    #[display("DEC {_0}")]
    Dec16(WideReg),
}

impl ArithmeticOp {
    pub const fn size(&self) -> u8 {
        match self {
            ArithmeticOp::Add(byte)
            | ArithmeticOp::Adc(byte)
            | ArithmeticOp::Sub(byte)
            | ArithmeticOp::Sbc(byte)
            | ArithmeticOp::And(byte)
            | ArithmeticOp::Xor(byte)
            | ArithmeticOp::Or(byte)
            | ArithmeticOp::Cp(byte) => byte.size(),
            ArithmeticOp::AddSP(_) => 2,
            ArithmeticOp::Add16(_)
            | ArithmeticOp::Inc(_)
            | ArithmeticOp::Inc16(_)
            | ArithmeticOp::Dec(_)
            | ArithmeticOp::Dec16(_) => 1,
        }
    }
}
