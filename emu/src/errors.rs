use thiserror::Error;

/// Operand forms the decoder recognizes but cannot decode yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedFeature {
    /// Data processing with a register (optionally shifted) second operand.
    RegisterOperand,

    /// Single data transfer with a shifted register offset.
    RegisterOffset,
}

impl std::fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegisterOperand => f.write_str("register operand in data processing"),
            Self::RegisterOffset => f.write_str("register offset in data transfer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The word belongs to a known class but uses an operand form outside
    /// the decoder's contract. Never degraded to `Unknown`.
    #[error("unsupported feature ({feature}) in 0x{word:08X} at 0x{pc:08X}")]
    UnsupportedFeature {
        word: u32,
        pc: u32,
        feature: UnsupportedFeature,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("pipeline is empty, call boot_fill before step")]
    NotBooted,

    #[error("pipeline already filled")]
    AlreadyBooted,
}
