//! Game implementations.

pub mod drop_token;
