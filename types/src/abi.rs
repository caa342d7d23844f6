//! Minimal ABI encoding of the arguments and return values of virtual contract methods.

use thiserror::Error;

use crate::{EvmAddress, EVM_ADDRESS_LENGTH, U256};

/// The number of bytes in an ABI word.
pub const WORD_LENGTH: usize = 32;

/// A 32-byte ABI word.
pub type Word = [u8; WORD_LENGTH];

/// Error returned when decoding ABI-encoded arguments.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiError {
    /// The arguments are shorter than the method requires.
    #[error("expected at least {expected} bytes of arguments, got {actual}")]
    ArgumentsTooShort {
        /// Required number of bytes.
        expected: usize,
        /// Number of bytes provided.
        actual: usize,
    },
    /// An address argument has non-zero padding.
    #[error("address argument {0} is not zero-padded")]
    DirtyAddressPadding(usize),
}

/// Encodes a `uint256`.
pub fn encode_uint256(value: U256) -> Word {
    value.to_be_word()
}

/// Encodes a `uint8`.
pub fn encode_uint8(value: u8) -> Word {
    let mut word = [0u8; WORD_LENGTH];
    word[WORD_LENGTH - 1] = value;
    word
}

/// Encodes a `bool`.
pub fn encode_bool(value: bool) -> Word {
    encode_uint8(u8::from(value))
}

/// Encodes an `address`.
pub fn encode_address(address: &EvmAddress) -> Word {
    let mut word = [0u8; WORD_LENGTH];
    word[WORD_LENGTH - EVM_ADDRESS_LENGTH..].copy_from_slice(address.as_bytes());
    word
}

/// Encodes a single dynamic `string` return value: the offset of the data, its length and the
/// bytes right-padded to a whole number of words.
pub fn encode_string(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let padded_length = (bytes.len() + WORD_LENGTH - 1) / WORD_LENGTH * WORD_LENGTH;
    let mut encoded = Vec::with_capacity(2 * WORD_LENGTH + padded_length);
    encoded.extend_from_slice(&encode_uint256(U256::from(WORD_LENGTH)));
    encoded.extend_from_slice(&encode_uint256(U256::from(bytes.len())));
    encoded.extend_from_slice(bytes);
    encoded.resize(2 * WORD_LENGTH + padded_length, 0);
    encoded
}

fn word_at(arguments: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * WORD_LENGTH;
    let end = start + WORD_LENGTH;
    arguments
        .get(start..end)
        .ok_or(AbiError::ArgumentsTooShort {
            expected: end,
            actual: arguments.len(),
        })
}

/// Decodes the `address` argument at position `index`.
pub fn decode_address(arguments: &[u8], index: usize) -> Result<EvmAddress, AbiError> {
    let word = word_at(arguments, index)?;
    let (padding, address) = word.split_at(WORD_LENGTH - EVM_ADDRESS_LENGTH);
    if padding.iter().any(|byte| *byte != 0) {
        return Err(AbiError::DirtyAddressPadding(index));
    }
    EvmAddress::try_from(address).map_err(|_| AbiError::ArgumentsTooShort {
        expected: (index + 1) * WORD_LENGTH,
        actual: arguments.len(),
    })
}

/// Decodes the `uint256` argument at position `index`.
pub fn decode_uint256(arguments: &[u8], index: usize) -> Result<U256, AbiError> {
    let word = word_at(arguments, index)?;
    Ok(U256::from_big_endian(word))
}
