//! Reconciliation engine for the auto-ingress controller
//!
//! This library provides:
//! - Ingress builder turning a public Service into its Ingress
//! - Inventory of the Ingresses managed per Service
//! - Bootstrap reconciliation against a full cluster snapshot
//! - Event processor applying Service label transitions

pub mod bootstrap;
pub mod builder;
pub mod client;
pub mod error;
pub mod inventory;
pub mod processor;

pub use bootstrap::Bootstrap;
pub use builder::IngressBuilder;
pub use client::IngressClient;
pub use error::{CoreError, Result};
pub use inventory::Inventory;
pub use processor::{EventProcessor, Outcome};
