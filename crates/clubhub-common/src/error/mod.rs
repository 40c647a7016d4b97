//! Error types shared by the client crates

mod client_error;

pub use client_error::{ClientError, ClientResult};
