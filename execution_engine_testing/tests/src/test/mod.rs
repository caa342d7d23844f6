mod private_chain;
mod system_contracts;
