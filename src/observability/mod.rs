//! Observability subsystem.
//!
//! All subsystems emit `tracing` events with structured fields
//! (contract address, tx hash, wallet kind). `logging.rs` installs the
//! subscriber.

pub mod logging;

pub use logging::init_logging;
