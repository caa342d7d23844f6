#[allow(clippy::assign_op_pattern, clippy::ptr_offset_with_cast, clippy::manual_range_contains)]
mod macro_code {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer, used for native balances and supplies.
        pub struct U256(4);
    }
}

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

pub use self::macro_code::U256;

/// The number of bytes in a big-endian encoded [`U256`].
pub const U256_BYTES_LENGTH: usize = 32;

impl U256 {
    /// Returns the 32-byte big-endian representation, as used by ABI-encoded words.
    pub fn to_be_word(&self) -> [u8; U256_BYTES_LENGTH] {
        let mut word = [0u8; U256_BYTES_LENGTH];
        self.to_big_endian(&mut word);
        word
    }

    /// Constructs a value from a 32-byte big-endian word.
    pub fn from_be_word(word: &[u8; U256_BYTES_LENGTH]) -> U256 {
        U256::from_big_endian(word)
    }
}

#[cfg(feature = "datasize")]
impl datasize::DataSize for U256 {
    const IS_DYNAMIC: bool = false;

    const STATIC_HEAP_SIZE: usize = 0;

    fn estimate_heap_size(&self) -> usize {
        0
    }
}

impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_string().serialize(serializer)
        } else {
            self.to_be_word().serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let decimal = String::deserialize(deserializer)?;
            U256::from_dec_str(&decimal).map_err(SerdeError::custom)
        } else {
            let word = <[u8; U256_BYTES_LENGTH]>::deserialize(deserializer)?;
            Ok(U256::from_be_word(&word))
        }
    }
}
