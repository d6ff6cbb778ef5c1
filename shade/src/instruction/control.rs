#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum ControlOp {
    /// Op Code: 0x76
    #[display("HALT")]
    Halt,
    /// Op Code: 0x00
    #[display("NOOP")]
    Noop,
    /// Op Code: 0x10. The op code is followed by a padding byte.
    #[display("STOP")]
    Stop,
}

impl ControlOp {
    /// Returns the size of the bytes to took to construct this instruction
    pub const fn size(&self) -> u8 {
        match self {
            ControlOp::Noop => 1,
            ControlOp::Stop => 2,
            ControlOp::Halt => 1,
        }
    }
}
