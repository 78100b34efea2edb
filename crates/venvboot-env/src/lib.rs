//! Python virtual environments for venvboot: layout, interpreter discovery,
//! creation, scoped activation and requirements install.
//!
//! Every external tool call is an [`process::Invocation`] handed to a
//! [`process::ProcessRunner`], so the sequence can be driven by a fake in tests.

pub mod activation;
pub mod builder;
pub mod error;
pub mod interpreter;
pub mod layout;
pub mod process;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use activation::{activate, ActiveEnvironment};
pub use error::{EnvError, Step};
pub use layout::EnvLayout;
pub use process::{Invocation, ProcessRunner, SystemRunner};
