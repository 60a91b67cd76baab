//! Persistence adapters. The device owns all durable token state; the only
//! thing the client keeps on disk is its own connection configuration.

pub mod config;
