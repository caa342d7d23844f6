//! Hash functions used for code hashes, contract addresses and module account addresses.

use blake2::{Blake2b, Digest};
use tiny_keccak::{Hasher, Keccak};

use crate::H256;

/// The number of bytes in a Blake2b hash as used by this crate.
pub const BLAKE2B_DIGEST_LENGTH: usize = 32;

/// The Keccak-256 hash of empty input, recorded as the code hash of accounts without code.
pub const EMPTY_CODE_HASH: H256 = H256::new([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// Computes the Keccak-256 hash of `data`.
pub fn keccak256<T: AsRef<[u8]>>(data: T) -> H256 {
    let mut hasher = Keccak::v256();
    hasher.update(data.as_ref());
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    H256::new(output)
}

/// Computes a Blake2b hash of `data`, truncated to [`BLAKE2B_DIGEST_LENGTH`] bytes.
pub fn blake2b<T: AsRef<[u8]>>(data: T) -> [u8; BLAKE2B_DIGEST_LENGTH] {
    let digest = Blake2b::digest(data.as_ref());
    let mut result = [0u8; BLAKE2B_DIGEST_LENGTH];
    result.copy_from_slice(&digest[..BLAKE2B_DIGEST_LENGTH]);
    result
}
