use alloy_primitives::Bytes;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BytecodeError {
    #[error("unlinked library placeholder at byte {0}; link libraries before composing")]
    Unlinked(usize),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Decodes compiler-emitted bytecode. The `0x` prefix is optional here since
/// build tools disagree on it; an empty string yields empty bytes.
pub fn decode_bytecode(raw: &str) -> Result<Bytes, BytecodeError> {
    let raw = raw.trim();
    let digits = raw.strip_prefix("0x").unwrap_or(raw);

    // solc leaves `__$<hash>$__` where library addresses still need linking
    if let Some(offset) = digits.find("__") {
        return Err(BytecodeError::Unlinked(offset / 2));
    }

    Ok(hex::decode(digits)?.into())
}
