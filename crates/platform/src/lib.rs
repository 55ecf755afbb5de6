//! runner-platform: OS-level operations for runner
//!
//! This crate provides the pieces of the pipeline that talk to the operating
//! system directly: privilege detection, file mode/ownership application on
//! generated files, and the final process handoff.

mod error;
mod exec;
mod ownership;
mod privilege;

pub use error::PlatformError;
pub use exec::handoff;
pub use ownership::{set_mode, set_owner};
pub use privilege::is_superuser;
