//! Atrium Salesforce - REST client for the CRM backing the BFF routes
//!
//! Exposes the `CrmApi` trait the web layer consumes and its Salesforce
//! implementation: OAuth password-grant authentication with a cached token,
//! SOQL queries, and sobject writes.

pub mod api;
pub mod client;
pub mod records;
pub mod soql;

pub use api::{CrmApi, SalesforceApiConfig};
pub use client::SalesforceClient;
pub use records::*;
