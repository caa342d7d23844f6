mod bank_contract;
mod deployer;
mod genesis;
