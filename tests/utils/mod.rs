pub mod actions;
pub mod assertions;
pub mod mocks;
pub mod setup;

pub use assertions::MessageAssertion;
pub use setup::{TestSetup, TestSetupBuilder, RIGHT, WRONG};
