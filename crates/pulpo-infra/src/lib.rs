//! Client side of the hosted record store.

pub mod airtable;

pub use airtable::{AirtableClient, AirtableError, DEFAULT_API_URL, TableRef};
