//! Types describing the effects of executing work against the global state.

mod effects;
mod transform;

pub use effects::Effects;
pub use transform::{Transform, TransformKind};
