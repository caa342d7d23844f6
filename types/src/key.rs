//! Keys of the global state.

use std::fmt::{self, Debug, Display, Formatter};

#[cfg(feature = "datasize")]
use datasize::DataSize;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};

use crate::{
    bytesrepr::{self, FromBytes, ToBytes, U64_SERIALIZED_LENGTH, U8_SERIALIZED_LENGTH},
    EvmAddress, H256,
};

/// The discriminant of a [`Key`], which is also the first byte of its serialized form.
///
/// Scanning the global state with the tag as prefix yields every key of that variant.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum KeyTag {
    /// Native accounts.
    Account = 0,
    /// Native balances.
    Balance = 1,
    /// Native total supplies.
    Supply = 2,
    /// Denomination metadata.
    DenomMetadata = 3,
    /// Contract code by hash.
    Code = 4,
    /// Contract storage slots.
    Storage = 5,
    /// Module parameters.
    Params = 6,
    /// Virtual contract records by insertion ordinal.
    VirtualContract = 7,
    /// Address to ordinal index of virtual contracts.
    VirtualContractAddress = 8,
    /// Denomination to address index of bank contracts.
    BankContractDenom = 9,
}

/// The key under which a value is stored in the global state.
#[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub enum Key {
    /// The native account at the given address.
    Account(EvmAddress),
    /// The balance of an address in a denomination.
    Balance(EvmAddress, String),
    /// The total supply of a denomination.
    Supply(String),
    /// The metadata of a denomination.
    DenomMetadata(String),
    /// Contract code, keyed by its Keccak-256 hash.
    Code(H256),
    /// A storage slot of a contract.
    Storage(EvmAddress, H256),
    /// The module parameters.
    Params,
    /// The virtual contract record with the given insertion ordinal.
    VirtualContract(u64),
    /// The insertion ordinal of the virtual contract at the given address.
    VirtualContractAddress(EvmAddress),
    /// The address of the bank contract registered for the given denomination.
    BankContractDenom(String),
}

impl Key {
    /// Returns the tag of this key.
    pub fn tag(&self) -> KeyTag {
        match self {
            Key::Account(_) => KeyTag::Account,
            Key::Balance(..) => KeyTag::Balance,
            Key::Supply(_) => KeyTag::Supply,
            Key::DenomMetadata(_) => KeyTag::DenomMetadata,
            Key::Code(_) => KeyTag::Code,
            Key::Storage(..) => KeyTag::Storage,
            Key::Params => KeyTag::Params,
            Key::VirtualContract(_) => KeyTag::VirtualContract,
            Key::VirtualContractAddress(_) => KeyTag::VirtualContractAddress,
            Key::BankContractDenom(_) => KeyTag::BankContractDenom,
        }
    }

    /// Returns the serialized prefix shared by all storage slots of `address`.
    pub fn storage_prefix(address: &EvmAddress) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(U8_SERIALIZED_LENGTH + address.serialized_length());
        prefix.push(KeyTag::Storage as u8);
        prefix.extend_from_slice(address.as_bytes());
        prefix
    }

    /// Returns the address held by this key, if any.
    pub fn as_address(&self) -> Option<&EvmAddress> {
        match self {
            Key::Account(address)
            | Key::Balance(address, _)
            | Key::Storage(address, _)
            | Key::VirtualContractAddress(address) => Some(address),
            Key::Supply(_)
            | Key::DenomMetadata(_)
            | Key::Code(_)
            | Key::Params
            | Key::VirtualContract(_)
            | Key::BankContractDenom(_) => None,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Key::Account(address) => write!(f, "Key::Account({})", address),
            Key::Balance(address, denom) => write!(f, "Key::Balance({}, {})", address, denom),
            Key::Supply(denom) => write!(f, "Key::Supply({})", denom),
            Key::DenomMetadata(denom) => write!(f, "Key::DenomMetadata({})", denom),
            Key::Code(code_hash) => write!(f, "Key::Code({})", code_hash),
            Key::Storage(address, slot) => write!(f, "Key::Storage({}, {})", address, slot),
            Key::Params => write!(f, "Key::Params"),
            Key::VirtualContract(ordinal) => write!(f, "Key::VirtualContract({})", ordinal),
            Key::VirtualContractAddress(address) => {
                write!(f, "Key::VirtualContractAddress({})", address)
            }
            Key::BankContractDenom(denom) => write!(f, "Key::BankContractDenom({})", denom),
        }
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ToBytes for Key {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                Key::Account(address) | Key::VirtualContractAddress(address) => {
                    address.serialized_length()
                }
                Key::Balance(address, denom) => {
                    address.serialized_length() + denom.serialized_length()
                }
                Key::Supply(denom) | Key::DenomMetadata(denom) | Key::BankContractDenom(denom) => {
                    denom.serialized_length()
                }
                Key::Code(code_hash) => code_hash.serialized_length(),
                Key::Storage(address, slot) => {
                    address.serialized_length() + slot.serialized_length()
                }
                Key::Params => 0,
                Key::VirtualContract(_) => U64_SERIALIZED_LENGTH,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.tag() as u8);
        match self {
            Key::Account(address) | Key::VirtualContractAddress(address) => {
                address.write_bytes(writer)
            }
            Key::Balance(address, denom) => {
                address.write_bytes(writer)?;
                denom.write_bytes(writer)
            }
            Key::Supply(denom) | Key::DenomMetadata(denom) | Key::BankContractDenom(denom) => {
                denom.write_bytes(writer)
            }
            Key::Code(code_hash) => code_hash.write_bytes(writer),
            Key::Storage(address, slot) => {
                address.write_bytes(writer)?;
                slot.write_bytes(writer)
            }
            Key::Params => Ok(()),
            // Big-endian so that the byte order of ordinals matches their numeric order.
            Key::VirtualContract(ordinal) => {
                writer.extend_from_slice(&ordinal.to_be_bytes());
                Ok(())
            }
        }
    }
}

impl FromBytes for Key {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        match KeyTag::from_u8(tag) {
            Some(KeyTag::Account) => {
                let (address, remainder) = EvmAddress::from_bytes(remainder)?;
                Ok((Key::Account(address), remainder))
            }
            Some(KeyTag::Balance) => {
                let (address, remainder) = EvmAddress::from_bytes(remainder)?;
                let (denom, remainder) = String::from_bytes(remainder)?;
                Ok((Key::Balance(address, denom), remainder))
            }
            Some(KeyTag::Supply) => {
                let (denom, remainder) = String::from_bytes(remainder)?;
                Ok((Key::Supply(denom), remainder))
            }
            Some(KeyTag::DenomMetadata) => {
                let (denom, remainder) = String::from_bytes(remainder)?;
                Ok((Key::DenomMetadata(denom), remainder))
            }
            Some(KeyTag::Code) => {
                let (code_hash, remainder) = H256::from_bytes(remainder)?;
                Ok((Key::Code(code_hash), remainder))
            }
            Some(KeyTag::Storage) => {
                let (address, remainder) = EvmAddress::from_bytes(remainder)?;
                let (slot, remainder) = H256::from_bytes(remainder)?;
                Ok((Key::Storage(address, slot), remainder))
            }
            Some(KeyTag::Params) => Ok((Key::Params, remainder)),
            Some(KeyTag::VirtualContract) => {
                let (ordinal, remainder) = <[u8; U64_SERIALIZED_LENGTH]>::from_bytes(remainder)?;
                Ok((Key::VirtualContract(u64::from_be_bytes(ordinal)), remainder))
            }
            Some(KeyTag::VirtualContractAddress) => {
                let (address, remainder) = EvmAddress::from_bytes(remainder)?;
                Ok((Key::VirtualContractAddress(address), remainder))
            }
            Some(KeyTag::BankContractDenom) => {
                let (denom, remainder) = String::from_bytes(remainder)?;
                Ok((Key::BankContractDenom(denom), remainder))
            }
            None => Err(bytesrepr::Error::Formatting),
        }
    }
}

impl From<EvmAddress> for Key {
    fn from(address: EvmAddress) -> Key {
        Key::Account(address)
    }
}

impl Distribution<Key> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Key {
        match rng.gen_range(0..10) {
            0 => Key::Account(rng.gen()),
            1 => Key::Balance(rng.gen(), format!("denom{}", rng.gen::<u8>())),
            2 => Key::Supply(format!("denom{}", rng.gen::<u8>())),
            3 => Key::DenomMetadata(format!("denom{}", rng.gen::<u8>())),
            4 => Key::Code(rng.gen()),
            5 => Key::Storage(rng.gen(), rng.gen()),
            6 => Key::Params,
            7 => Key::VirtualContract(rng.gen()),
            8 => Key::VirtualContractAddress(rng.gen()),
            9 => Key::BankContractDenom(format!("denom{}", rng.gen::<u8>())),
            _ => unreachable!(),
        }
    }
}
