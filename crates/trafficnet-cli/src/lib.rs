//! Trafficnet CLI library.
//!
//! Output formatting and terminal styling shared by the `trafficnet-cli`
//! binary.

pub mod output;
pub mod terminal;
