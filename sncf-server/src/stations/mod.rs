//! Station name resolution.
//!
//! Turns a free-text station name into an upstream location id by taking
//! the upstream's best-ranked place match, keeping the runners-up so they
//! can be shown to the caller.

mod resolver;

pub use resolver::{StationMatch, StationResolver};
