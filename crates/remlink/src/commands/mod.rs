//! Command handlers, one module per command family.

pub mod automation;
pub mod codes;
pub mod devices;
pub mod learn;
