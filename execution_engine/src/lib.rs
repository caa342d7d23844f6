//! The engine behind the frontier bridge: a registry of virtual contracts, their deployer, the
//! genesis import and export of the execution environment module, and the virtual bank contract.

#![doc(test(attr(forbid(warnings))))]
#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]

pub mod data_access_layer;
pub mod engine_state;
pub mod global_state;
pub mod shared;
pub mod system;
pub mod tracking_copy;

pub use global_state::{
    in_memory::InMemoryGlobalState, CommitProvider, StateProvider, StateReader,
};
pub use tracking_copy::TrackingCopy;
