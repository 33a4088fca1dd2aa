//! bpconsole command-line front end.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error
//! - 2: Validation blocked the form, or BindPlane reported the resource invalid

pub mod apply;
pub mod cli;
pub mod error;
pub mod groups;
pub mod input;
pub mod report;
pub mod table;
pub mod validate;

pub use cli::{Cli, Commands, KindArg};
pub use error::CommandError;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_BLOCKED: i32 = 2;
