use derive_more::From;

use crate::instruction::BitOp;
use crate::instruction::BitShiftOp;

/// An operation from the secondary (0xCB) table. These never move the program counter themselves.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, From, derive_more::Display)]
#[display("{_variant}")]
pub enum PrefixedOp {
    #[display("{_0}")]
    BitShift(BitShiftOp),
    #[display("{_0}")]
    Bit(BitOp),
}
