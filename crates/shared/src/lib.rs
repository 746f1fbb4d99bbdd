//! Element model and error vocabulary shared by the store and the shell.

pub mod domain;
pub mod error;
