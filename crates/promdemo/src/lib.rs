//! Top-level facade crate for promdemo.
//!
//! Re-exports the metrics core and the server library so users can depend on a single crate.

pub mod core {
    pub use promdemo_core::*;
}

pub mod server {
    pub use promdemo_server::*;
}
