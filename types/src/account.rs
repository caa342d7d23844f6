//! Contains types and constants associated with native accounts.

#[cfg(feature = "datasize")]
use datasize::DataSize;
use serde::{Deserialize, Serialize};

use crate::{
    bytesrepr::{self, FromBytes, ToBytes, U8_SERIALIZED_LENGTH},
    crypto, EvmAddress, H256, EMPTY_CODE_HASH, EVM_ADDRESS_LENGTH,
};

/// The capability carried by accounts which the execution environment can address.
pub const EVM_ACCOUNT_CAPABILITY: &str = "evm-account";
/// The capability carried by module-owned accounts.
pub const MODULE_ACCOUNT_CAPABILITY: &str = "module-account";

const MODULE_ADDRESS_DOMAIN: &str = "module/";

const BASE_TAG: u8 = 0;
const MODULE_TAG: u8 = 1;
const EVM_TAG: u8 = 2;

/// Returns the address of the module account named `name`.
///
/// The address is the first 20 bytes of the Blake2b hash of `"module/" + name`.
pub fn module_address(name: &str) -> EvmAddress {
    let digest = crypto::blake2b(format!("{}{}", MODULE_ADDRESS_DOMAIN, name));
    let mut address = [0u8; EVM_ADDRESS_LENGTH];
    address.copy_from_slice(&digest[..EVM_ADDRESS_LENGTH]);
    EvmAddress::new(address)
}

/// The EVM-specific part of an account: the hash of the code deployed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct EvmAccount {
    code_hash: H256,
}

impl EvmAccount {
    /// Returns the Keccak-256 hash of the account's code.
    pub fn code_hash(&self) -> H256 {
        self.code_hash
    }

    /// Returns `true` if the account has no code.
    pub fn is_empty_code(&self) -> bool {
        self.code_hash == EMPTY_CODE_HASH
    }
}

/// The kind of a native account, which determines its capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub enum AccountKind {
    /// A plain account, invisible to the execution environment.
    Base,
    /// An account owned by a named module.
    Module {
        /// Name of the owning module.
        name: String,
    },
    /// An account addressable by the execution environment.
    Evm(EvmAccount),
}

/// A native ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct Account {
    address: EvmAddress,
    sequence: u64,
    kind: AccountKind,
}

impl Account {
    /// Creates a plain account.
    pub fn new_base(address: EvmAddress) -> Self {
        Account {
            address,
            sequence: 0,
            kind: AccountKind::Base,
        }
    }

    /// Creates the account of module `name`, at its derived address.
    pub fn new_module(name: &str) -> Self {
        Account {
            address: module_address(name),
            sequence: 0,
            kind: AccountKind::Module {
                name: name.to_string(),
            },
        }
    }

    /// Creates an account addressable by the execution environment with the given code hash.
    pub fn new_evm(address: EvmAddress, code_hash: H256) -> Self {
        Account {
            address,
            sequence: 0,
            kind: AccountKind::Evm(EvmAccount { code_hash }),
        }
    }

    /// Returns the account's address.
    pub fn address(&self) -> EvmAddress {
        self.address
    }

    /// Returns the account's sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Sets the account's sequence number.
    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Returns the account's kind.
    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    /// Returns `true` if the account carries `capability`.
    pub fn has_capability(&self, capability: &str) -> bool {
        match capability {
            EVM_ACCOUNT_CAPABILITY => matches!(self.kind, AccountKind::Evm(_)),
            MODULE_ACCOUNT_CAPABILITY => matches!(self.kind, AccountKind::Module { .. }),
            _ => false,
        }
    }

    /// Returns the EVM view of this account, if it carries the EVM capability.
    pub fn as_evm(&self) -> Option<&EvmAccount> {
        match &self.kind {
            AccountKind::Evm(evm_account) => Some(evm_account),
            AccountKind::Base | AccountKind::Module { .. } => None,
        }
    }

    /// Returns the owning module's name, if this is a module account.
    pub fn module_name(&self) -> Option<&str> {
        match &self.kind {
            AccountKind::Module { name } => Some(name),
            AccountKind::Base | AccountKind::Evm(_) => None,
        }
    }
}

impl ToBytes for Account {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.address.serialized_length()
            + self.sequence.serialized_length()
            + U8_SERIALIZED_LENGTH
            + match &self.kind {
                AccountKind::Base => 0,
                AccountKind::Module { name } => name.serialized_length(),
                AccountKind::Evm(evm_account) => evm_account.code_hash.serialized_length(),
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.address.write_bytes(writer)?;
        self.sequence.write_bytes(writer)?;
        match &self.kind {
            AccountKind::Base => writer.push(BASE_TAG),
            AccountKind::Module { name } => {
                writer.push(MODULE_TAG);
                name.write_bytes(writer)?;
            }
            AccountKind::Evm(evm_account) => {
                writer.push(EVM_TAG);
                evm_account.code_hash.write_bytes(writer)?;
            }
        }
        Ok(())
    }
}

impl FromBytes for Account {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (address, remainder) = EvmAddress::from_bytes(bytes)?;
        let (sequence, remainder) = u64::from_bytes(remainder)?;
        let (tag, remainder) = u8::from_bytes(remainder)?;
        let (kind, remainder) = match tag {
            BASE_TAG => (AccountKind::Base, remainder),
            MODULE_TAG => {
                let (name, remainder) = String::from_bytes(remainder)?;
                (AccountKind::Module { name }, remainder)
            }
            EVM_TAG => {
                let (code_hash, remainder) = H256::from_bytes(remainder)?;
                (AccountKind::Evm(EvmAccount { code_hash }), remainder)
            }
            _ => return Err(bytesrepr::Error::Formatting),
        };
        Ok((
            Account {
                address,
                sequence,
                kind,
            },
            remainder,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evm_account_should_carry_evm_capability() {
        let account = Account::new_evm(EvmAddress::new([1; 20]), EMPTY_CODE_HASH);
        assert!(account.has_capability(EVM_ACCOUNT_CAPABILITY));
        assert!(!account.has_capability(MODULE_ACCOUNT_CAPABILITY));
        assert!(account.as_evm().unwrap().is_empty_code());
    }

    #[test]
    fn base_and_module_accounts_should_not_carry_evm_capability() {
        let base = Account::new_base(EvmAddress::new([2; 20]));
        assert!(!base.has_capability(EVM_ACCOUNT_CAPABILITY));
        assert!(base.as_evm().is_none());

        let module = Account::new_module("evm");
        assert!(!module.has_capability(EVM_ACCOUNT_CAPABILITY));
        assert!(module.has_capability(MODULE_ACCOUNT_CAPABILITY));
        assert_eq!(module.module_name(), Some("evm"));
        assert_eq!(module.address(), module_address("evm"));
    }

    #[test]
    fn unknown_capability_should_not_be_carried() {
        let account = Account::new_evm(EvmAddress::new([1; 20]), EMPTY_CODE_HASH);
        assert!(!account.has_capability("staking"));
    }

    #[test]
    fn module_addresses_should_differ_per_module() {
        assert_ne!(module_address("evm"), module_address("vfc-deployer"));
        assert!(!module_address("evm").is_nil());
    }

    #[test]
    fn bytesrepr_roundtrip() {
        let mut account = Account::new_module("vfc-deployer");
        account.set_sequence(42);
        bytesrepr::test_serialization_roundtrip(&account);
        bytesrepr::test_serialization_roundtrip(&Account::new_base(EvmAddress::new([3; 20])));
        bytesrepr::test_serialization_roundtrip(&Account::new_evm(
            EvmAddress::new([4; 20]),
            H256::new([5; 32]),
        ));
    }
}
