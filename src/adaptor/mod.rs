//! Yield adaptor entry point.
//!
//! Exposes the one computation (`apy`) together with its static descriptor,
//! and the source traits the computation is written against.

mod pipeline;
mod traits;

pub use pipeline::{GammaAdaptor, GAMMA_DESCRIPTOR};
pub use traits::{AdaptorDescriptor, HypervisorSource, PriceSource, YieldAdaptor};
