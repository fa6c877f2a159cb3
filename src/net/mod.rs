//! Networking modules for the rooms REST API and the auth provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` wraps the rooms backend, `auth_provider` speaks the hosted auth
//! service's REST contract, and `types` defines the shared wire schema.

pub mod api;
pub mod auth_provider;
pub mod types;
