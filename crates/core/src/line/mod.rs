//! Production line sources.
//!
//! A production line yields sheets until it signals end of stream and takes
//! analyzed sheets back. The pipeline guarantees sheets come back in the order
//! they were fetched, exactly once each.

mod queue;
mod traits;

pub use queue::QueueLine;
pub use traits::ProductionLine;
