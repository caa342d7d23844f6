use frontier_types::{
    bytesrepr::Bytes, module_address, Account, DenomMetadata, EvmAddress, Key, KeyTag, Params,
    StorageEntry, StoredValue, H256, U256,
};

use crate::{
    global_state::{error::Error as GlobalStateError, StateReader},
    tracking_copy::{TrackingCopy, TrackingCopyError},
};

/// Operations on native accounts via a `TrackingCopy`.
pub trait TrackingCopyAccountExt<R> {
    /// The type for the returned errors.
    type Error;

    /// Reads the account at `address`.
    fn account(&mut self, address: EvmAddress) -> Result<Option<Account>, Self::Error>;

    /// Writes `account` under its own address.
    fn write_account(&mut self, account: Account);

    /// Returns the address of the module account `name`, if that account exists.
    fn module_address(&mut self, name: &str) -> Result<Option<EvmAddress>, Self::Error>;

    /// Reads the module account `name`.
    fn module_account(&mut self, name: &str) -> Result<Option<Account>, Self::Error>;

    /// Reads every account, in address order.
    fn accounts(&mut self) -> Result<Vec<Account>, Self::Error>;
}

/// Operations on native balances and denominations via a `TrackingCopy`.
pub trait TrackingCopyBankExt<R> {
    /// The type for the returned errors.
    type Error;

    /// Reads the balance of `address` in `denom`; absent balances are zero.
    fn balance(&mut self, address: EvmAddress, denom: &str) -> Result<U256, Self::Error>;

    /// Writes the balance of `address` in `denom`. A zero balance is pruned.
    fn write_balance(&mut self, address: EvmAddress, denom: &str, amount: U256);

    /// Reads the total supply of `denom`; absent supplies are zero.
    fn total_supply(&mut self, denom: &str) -> Result<U256, Self::Error>;

    /// Creates `amount` of `denom` in the balance of `address`.
    fn mint(&mut self, address: EvmAddress, denom: &str, amount: U256) -> Result<(), Self::Error>;

    /// Moves `amount` of `denom` from `from` to `to`.
    fn transfer(
        &mut self,
        from: EvmAddress,
        to: EvmAddress,
        denom: &str,
        amount: U256,
    ) -> Result<(), Self::Error>;

    /// Reads the metadata of `denom`.
    fn denom_metadata(&mut self, denom: &str) -> Result<Option<DenomMetadata>, Self::Error>;

    /// Writes `metadata` under its base denomination.
    fn write_denom_metadata(&mut self, metadata: DenomMetadata);
}

/// Operations on execution environment code, storage and parameters via a `TrackingCopy`.
pub trait TrackingCopyEvmExt<R> {
    /// The type for the returned errors.
    type Error;

    /// Reads the module parameters.
    fn params(&mut self) -> Result<Option<Params>, Self::Error>;

    /// Writes the module parameters.
    fn write_params(&mut self, params: Params);

    /// Reads the code with hash `code_hash`.
    fn code(&mut self, code_hash: H256) -> Result<Option<Bytes>, Self::Error>;

    /// Writes `code` under `code_hash`. Empty code is not stored.
    fn write_code(&mut self, code_hash: H256, code: Bytes);

    /// Reads a storage slot of `address`; absent slots are zero.
    fn state(&mut self, address: EvmAddress, key: H256) -> Result<H256, Self::Error>;

    /// Writes a storage slot of `address`. A zero word is stored like any other value.
    fn write_state(&mut self, address: EvmAddress, key: H256, value: H256);

    /// Reads every non-zero storage slot of `address`, ordered by slot.
    fn account_storage(&mut self, address: EvmAddress) -> Result<Vec<StorageEntry>, Self::Error>;
}

impl<R> TrackingCopyAccountExt<R> for TrackingCopy<R>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    type Error = TrackingCopyError;

    fn account(&mut self, address: EvmAddress) -> Result<Option<Account>, Self::Error> {
        self.read_as(&Key::Account(address))
    }

    fn write_account(&mut self, account: Account) {
        self.write(
            Key::Account(account.address()),
            StoredValue::Account(account),
        );
    }

    fn module_address(&mut self, name: &str) -> Result<Option<EvmAddress>, Self::Error> {
        Ok(self.module_account(name)?.map(|account| account.address()))
    }

    fn module_account(&mut self, name: &str) -> Result<Option<Account>, Self::Error> {
        match self.account(module_address(name))? {
            Some(account) if account.module_name() == Some(name) => Ok(Some(account)),
            Some(_) | None => Ok(None),
        }
    }

    fn accounts(&mut self) -> Result<Vec<Account>, Self::Error> {
        let mut ret = Vec::new();
        for key in self.get_keys(&KeyTag::Account)? {
            match self.read_as::<Account>(&key)? {
                Some(account) => ret.push(account),
                None => return Err(TrackingCopyError::KeyNotFound(key)),
            }
        }
        Ok(ret)
    }
}

impl<R> TrackingCopyBankExt<R> for TrackingCopy<R>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    type Error = TrackingCopyError;

    fn balance(&mut self, address: EvmAddress, denom: &str) -> Result<U256, Self::Error> {
        Ok(self
            .read_as(&Key::Balance(address, denom.to_string()))?
            .unwrap_or_default())
    }

    fn write_balance(&mut self, address: EvmAddress, denom: &str, amount: U256) {
        let key = Key::Balance(address, denom.to_string());
        if amount.is_zero() {
            self.prune(key);
        } else {
            self.write(key, StoredValue::Balance(amount));
        }
    }

    fn total_supply(&mut self, denom: &str) -> Result<U256, Self::Error> {
        Ok(self
            .read_as(&Key::Supply(denom.to_string()))?
            .unwrap_or_default())
    }

    fn mint(&mut self, address: EvmAddress, denom: &str, amount: U256) -> Result<(), Self::Error> {
        let supply_key = Key::Supply(denom.to_string());
        let supply = self
            .total_supply(denom)?
            .checked_add(amount)
            .ok_or_else(|| TrackingCopyError::Overflow(supply_key.clone()))?;
        let balance = self
            .balance(address, denom)?
            .checked_add(amount)
            .ok_or_else(|| TrackingCopyError::Overflow(Key::Balance(address, denom.to_string())))?;
        self.write(supply_key, StoredValue::Balance(supply));
        self.write_balance(address, denom, balance);
        Ok(())
    }

    fn transfer(
        &mut self,
        from: EvmAddress,
        to: EvmAddress,
        denom: &str,
        amount: U256,
    ) -> Result<(), Self::Error> {
        let available = self.balance(from, denom)?;
        if available < amount {
            return Err(TrackingCopyError::InsufficientFunds {
                address: from,
                denom: denom.to_string(),
                available,
                requested: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(to, denom)?
            .checked_add(amount)
            .ok_or_else(|| TrackingCopyError::Overflow(Key::Balance(to, denom.to_string())))?;
        self.write_balance(from, denom, available - amount);
        self.write_balance(to, denom, credited);
        Ok(())
    }

    fn denom_metadata(&mut self, denom: &str) -> Result<Option<DenomMetadata>, Self::Error> {
        self.read_as(&Key::DenomMetadata(denom.to_string()))
    }

    fn write_denom_metadata(&mut self, metadata: DenomMetadata) {
        self.write(
            Key::DenomMetadata(metadata.base.clone()),
            StoredValue::DenomMetadata(metadata),
        );
    }
}

impl<R> TrackingCopyEvmExt<R> for TrackingCopy<R>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    type Error = TrackingCopyError;

    fn params(&mut self) -> Result<Option<Params>, Self::Error> {
        self.read_as(&Key::Params)
    }

    fn write_params(&mut self, params: Params) {
        self.write(Key::Params, StoredValue::Params(params));
    }

    fn code(&mut self, code_hash: H256) -> Result<Option<Bytes>, Self::Error> {
        self.read_as(&Key::Code(code_hash))
    }

    fn write_code(&mut self, code_hash: H256, code: Bytes) {
        if code.is_empty() {
            return;
        }
        self.write(Key::Code(code_hash), StoredValue::Code(code));
    }

    fn state(&mut self, address: EvmAddress, key: H256) -> Result<H256, Self::Error> {
        Ok(self
            .read_as(&Key::Storage(address, key))?
            .unwrap_or_default())
    }

    fn write_state(&mut self, address: EvmAddress, key: H256, value: H256) {
        self.write(Key::Storage(address, key), StoredValue::StorageValue(value));
    }

    fn account_storage(&mut self, address: EvmAddress) -> Result<Vec<StorageEntry>, Self::Error> {
        let mut ret = Vec::new();
        for key in self.get_keys_with_prefix(&Key::storage_prefix(&address))? {
            if let Key::Storage(_, slot) = key {
                let value = self.state(address, slot)?;
                ret.push(StorageEntry::new(slot, value));
            }
        }
        Ok(ret)
    }
}
