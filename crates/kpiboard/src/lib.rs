//! Top-level facade crate for kpiboard.
//!
//! Re-exports the persistence core and the HTTP gateway so users can depend on a single crate.

pub mod core {
    pub use kpiboard_core::*;
}

pub mod gateway {
    pub use kpiboard_gateway::*;
}
