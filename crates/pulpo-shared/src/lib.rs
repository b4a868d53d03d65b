//! Types shared between the record-store client and the hub.

pub mod schemas;
pub mod utils;
