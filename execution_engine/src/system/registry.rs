//! The registry of virtual contracts.
//!
//! Records are stored under their insertion ordinal, which makes iteration order equal to
//! insertion order. Two indices point into them: contract address to ordinal, and denomination to
//! bank contract address.

use thiserror::Error;
use tracing::debug;

use frontier_types::{
    EvmAddress, Key, KeyTag, MetadataError, StoredValue, ValidationError, VirtualContract,
};

use crate::{
    global_state::{error::Error as GlobalStateError, StateReader},
    tracking_copy::{TrackingCopy, TrackingCopyError},
};

/// Errors raised by the virtual contract registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// The record does not pass basic validation.
    #[error("invalid virtual frontier contract: {0}")]
    InvalidRecord(#[from] ValidationError),
    /// A record already exists at the address.
    #[error("virtual frontier contract already exists at {0}")]
    DuplicateAddress(EvmAddress),
    /// An active bank contract already serves the denomination.
    #[error("denom {denom} is already served by the active bank contract {existing}")]
    DuplicateDenomination {
        /// The denomination.
        denom: String,
        /// Address of the active bank contract serving it.
        existing: EvmAddress,
    },
    /// No record exists at the address.
    #[error("virtual frontier contract not found at {0}")]
    NotFound(EvmAddress),
    /// A stored record carries undecodable metadata.
    #[error("stored virtual frontier contract has invalid metadata: {0}")]
    Metadata(#[from] MetadataError),
    /// The ordinal index points to a missing record.
    #[error("no virtual frontier contract stored under ordinal {0}")]
    MissingRecord(u64),
    /// Error reading or writing the state.
    #[error(transparent)]
    TrackingCopy(#[from] TrackingCopyError),
}

/// Virtual contract records held in the state, via a `TrackingCopy`.
pub trait VirtualContractRegistry<R> {
    /// The type for the returned errors.
    type Error;

    /// Stores a new record after validating it.
    fn create_virtual_contract(
        &mut self,
        contract: VirtualContract,
    ) -> Result<EvmAddress, Self::Error>;

    /// Reads the record at `address`.
    fn virtual_contract(
        &mut self,
        address: EvmAddress,
    ) -> Result<Option<VirtualContract>, Self::Error>;

    /// Returns the first active bank contract for `denom`, in insertion order.
    fn bank_contract_by_denom(&mut self, denom: &str)
        -> Result<Option<VirtualContract>, Self::Error>;

    /// Looks up the bank contract address registered for `denom`.
    fn bank_contract_address_by_denom(
        &mut self,
        denom: &str,
    ) -> Result<Option<EvmAddress>, Self::Error>;

    /// Visits every record in insertion order until `visitor` returns `true`.
    fn iterate_virtual_contracts<F>(&mut self, visitor: F) -> Result<(), Self::Error>
    where
        F: FnMut(&VirtualContract) -> bool;

    /// Returns every record in insertion order.
    fn virtual_contracts(&mut self) -> Result<Vec<VirtualContract>, Self::Error>;

    /// Returns the number of records.
    fn virtual_contract_count(&mut self) -> Result<u64, Self::Error>;

    /// Activates or deactivates the record at `address`.
    fn set_virtual_contract_active(
        &mut self,
        address: EvmAddress,
        active: bool,
    ) -> Result<(), Self::Error>;
}

impl<R> VirtualContractRegistry<R> for TrackingCopy<R>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    type Error = RegistryError;

    fn create_virtual_contract(
        &mut self,
        contract: VirtualContract,
    ) -> Result<EvmAddress, Self::Error> {
        contract.validate_basic()?;
        let address = contract.contract_address();
        if self.read_ordinal(address)?.is_some() {
            return Err(RegistryError::DuplicateAddress(address));
        }
        let denom = match contract.bank_contract_metadata() {
            Some(metadata) => {
                if contract.active {
                    self.ensure_denom_unserved(&metadata.min_denom, address)?;
                }
                Some(metadata.min_denom)
            }
            None => None,
        };

        let ordinal = self.virtual_contract_count()?;
        if let Some(denom) = denom {
            let index_key = Key::BankContractDenom(denom);
            if contract.active || self.get(&index_key)?.is_none() {
                self.write(index_key, StoredValue::Address(address));
            }
        }
        self.write(
            Key::VirtualContractAddress(address),
            StoredValue::VirtualContractOrdinal(ordinal),
        );
        self.write(
            Key::VirtualContract(ordinal),
            StoredValue::VirtualContract(contract),
        );
        debug!(%address, ordinal, "created virtual frontier contract");
        Ok(address)
    }

    fn virtual_contract(
        &mut self,
        address: EvmAddress,
    ) -> Result<Option<VirtualContract>, Self::Error> {
        match self.read_ordinal(address)? {
            Some(ordinal) => self.read_record(ordinal).map(Some),
            None => Ok(None),
        }
    }

    fn bank_contract_by_denom(
        &mut self,
        denom: &str,
    ) -> Result<Option<VirtualContract>, Self::Error> {
        let mut found = None;
        self.iterate_virtual_contracts(|contract| {
            if !contract.active {
                return false;
            }
            match contract.bank_contract_metadata() {
                Some(metadata) if metadata.min_denom == denom => {
                    found = Some(contract.clone());
                    true
                }
                Some(_) | None => false,
            }
        })?;
        Ok(found)
    }

    fn bank_contract_address_by_denom(
        &mut self,
        denom: &str,
    ) -> Result<Option<EvmAddress>, Self::Error> {
        Ok(self.read_as(&Key::BankContractDenom(denom.to_string()))?)
    }

    fn iterate_virtual_contracts<F>(&mut self, mut visitor: F) -> Result<(), Self::Error>
    where
        F: FnMut(&VirtualContract) -> bool,
    {
        for key in self.get_keys(&KeyTag::VirtualContract)? {
            let contract = match self.read_as::<VirtualContract>(&key)? {
                Some(contract) => contract,
                None => return Err(TrackingCopyError::KeyNotFound(key).into()),
            };
            if visitor(&contract) {
                break;
            }
        }
        Ok(())
    }

    fn virtual_contracts(&mut self) -> Result<Vec<VirtualContract>, Self::Error> {
        let mut ret = Vec::new();
        self.iterate_virtual_contracts(|contract| {
            ret.push(contract.clone());
            false
        })?;
        Ok(ret)
    }

    fn virtual_contract_count(&mut self) -> Result<u64, Self::Error> {
        Ok(self.get_keys(&KeyTag::VirtualContract)?.len() as u64)
    }

    fn set_virtual_contract_active(
        &mut self,
        address: EvmAddress,
        active: bool,
    ) -> Result<(), Self::Error> {
        let ordinal = self
            .read_ordinal(address)?
            .ok_or(RegistryError::NotFound(address))?;
        let mut contract = self.read_record(ordinal)?;
        if contract.active == active {
            return Ok(());
        }
        if active && contract.is_bank_contract() {
            let metadata = contract.decoded_metadata()?;
            if let Some(bank_metadata) = metadata.as_bank_contract() {
                self.ensure_denom_unserved(&bank_metadata.min_denom, address)?;
                self.write(
                    Key::BankContractDenom(bank_metadata.min_denom.clone()),
                    StoredValue::Address(address),
                );
            }
        }
        contract.active = active;
        self.write(
            Key::VirtualContract(ordinal),
            StoredValue::VirtualContract(contract),
        );
        debug!(%address, active, "changed virtual frontier contract activation");
        Ok(())
    }
}

trait RegistryStateExt {
    fn read_ordinal(&mut self, address: EvmAddress) -> Result<Option<u64>, RegistryError>;

    fn read_record(&mut self, ordinal: u64) -> Result<VirtualContract, RegistryError>;

    fn ensure_denom_unserved(
        &mut self,
        denom: &str,
        candidate: EvmAddress,
    ) -> Result<(), RegistryError>;
}

impl<R> RegistryStateExt for TrackingCopy<R>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    fn read_ordinal(&mut self, address: EvmAddress) -> Result<Option<u64>, RegistryError> {
        Ok(self.read_as(&Key::VirtualContractAddress(address))?)
    }

    fn read_record(&mut self, ordinal: u64) -> Result<VirtualContract, RegistryError> {
        self.read_as(&Key::VirtualContract(ordinal))?
            .ok_or(RegistryError::MissingRecord(ordinal))
    }

    fn ensure_denom_unserved(
        &mut self,
        denom: &str,
        candidate: EvmAddress,
    ) -> Result<(), RegistryError> {
        match self.bank_contract_by_denom(denom)? {
            Some(existing) if existing.contract_address() != candidate => {
                Err(RegistryError::DuplicateDenomination {
                    denom: denom.to_string(),
                    existing: existing.contract_address(),
                })
            }
            Some(_) | None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use frontier_types::{bytesrepr::ToBytes, BankContractMetadata, ContractType};

    use super::*;
    use crate::global_state::{
        in_memory::{InMemoryGlobalState, InMemoryGlobalStateView},
        StateProvider,
    };

    fn tracking_copy() -> TrackingCopy<InMemoryGlobalStateView> {
        InMemoryGlobalState::empty().tracking_copy().unwrap()
    }

    fn bank_contract(byte: u8, denom: &str, active: bool) -> VirtualContract {
        let metadata = BankContractMetadata::new(denom, 18, "PHOTON")
            .to_bytes()
            .unwrap();
        VirtualContract::new(
            EvmAddress::new([byte; 20]),
            active,
            ContractType::BankContract,
            metadata.into(),
        )
    }

    #[test]
    fn should_create_and_read_back() {
        let mut tc = tracking_copy();
        let contract = bank_contract(1, "aphoton", true);
        let address = tc.create_virtual_contract(contract.clone()).unwrap();
        assert_eq!(address, EvmAddress::new([1; 20]));
        assert_eq!(tc.virtual_contract(address).unwrap(), Some(contract));
        assert_eq!(tc.virtual_contract_count().unwrap(), 1);
        assert_eq!(
            tc.bank_contract_address_by_denom("aphoton").unwrap(),
            Some(address)
        );
    }

    #[test]
    fn should_iterate_in_insertion_order() {
        let mut tc = tracking_copy();
        for byte in [9u8, 3, 200, 1] {
            tc.create_virtual_contract(bank_contract(byte, &format!("denom{}", byte), true))
                .unwrap();
        }
        let order: Vec<u8> = tc
            .virtual_contracts()
            .unwrap()
            .iter()
            .map(|contract| contract.contract_address().value()[0])
            .collect();
        assert_eq!(order, vec![9, 3, 200, 1]);
    }

    #[test]
    fn visitor_should_stop_early() {
        let mut tc = tracking_copy();
        for byte in 1..=3u8 {
            tc.create_virtual_contract(bank_contract(byte, &format!("denom{}", byte), true))
                .unwrap();
        }
        let mut visited = 0;
        tc.iterate_virtual_contracts(|_| {
            visited += 1;
            visited == 2
        })
        .unwrap();
        assert_eq!(visited, 2);
    }

    #[test]
    fn should_reject_invalid_record() {
        let mut tc = tracking_copy();
        let mut contract = bank_contract(1, "aphoton", true);
        contract.contract_type = ContractType::Unknown as u32;
        assert_matches!(
            tc.create_virtual_contract(contract),
            Err(RegistryError::InvalidRecord(ValidationError::TypeNotSpecified))
        );
        assert!(tc.effects().is_empty());
    }

    #[test]
    fn should_reject_duplicate_address() {
        let mut tc = tracking_copy();
        tc.create_virtual_contract(bank_contract(1, "aphoton", true))
            .unwrap();
        assert_matches!(
            tc.create_virtual_contract(bank_contract(1, "uatom", true)),
            Err(RegistryError::DuplicateAddress(_))
        );
    }

    #[test]
    fn should_reject_second_active_bank_contract_for_denom() {
        let mut tc = tracking_copy();
        tc.create_virtual_contract(bank_contract(1, "aphoton", true))
            .unwrap();
        assert_matches!(
            tc.create_virtual_contract(bank_contract(2, "aphoton", true)),
            Err(RegistryError::DuplicateDenomination { existing, .. }) if existing == EvmAddress::new([1; 20])
        );
        tc.create_virtual_contract(bank_contract(3, "aphoton", false))
            .unwrap();
        assert_eq!(
            tc.bank_contract_address_by_denom("aphoton").unwrap(),
            Some(EvmAddress::new([1; 20]))
        );
    }

    #[test]
    fn lookup_by_denom_should_skip_inactive_contracts() {
        let mut tc = tracking_copy();
        tc.create_virtual_contract(bank_contract(1, "aphoton", false))
            .unwrap();
        assert_eq!(tc.bank_contract_by_denom("aphoton").unwrap(), None);
        tc.create_virtual_contract(bank_contract(2, "aphoton", true))
            .unwrap();
        assert_eq!(
            tc.bank_contract_by_denom("aphoton")
                .unwrap()
                .map(|contract| contract.contract_address()),
            Some(EvmAddress::new([2; 20]))
        );
    }

    #[test]
    fn reactivation_should_recheck_denomination() {
        let mut tc = tracking_copy();
        let first = tc
            .create_virtual_contract(bank_contract(1, "aphoton", true))
            .unwrap();
        tc.set_virtual_contract_active(first, false).unwrap();
        let second = tc
            .create_virtual_contract(bank_contract(2, "aphoton", true))
            .unwrap();
        assert_matches!(
            tc.set_virtual_contract_active(first, true),
            Err(RegistryError::DuplicateDenomination { .. })
        );
        tc.set_virtual_contract_active(second, false).unwrap();
        tc.set_virtual_contract_active(first, true).unwrap();
        assert_eq!(
            tc.bank_contract_address_by_denom("aphoton").unwrap(),
            Some(first)
        );
        assert_eq!(tc.virtual_contract_count().unwrap(), 2);
    }

    #[test]
    fn deactivating_unknown_address_should_fail() {
        let mut tc = tracking_copy();
        assert_matches!(
            tc.set_virtual_contract_active(EvmAddress::new([1; 20]), false),
            Err(RegistryError::NotFound(_))
        );
    }
}
