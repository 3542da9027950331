//! Relational store for shipments, service items, pricing geography and
//! payment history.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - Repository layer for reads and the shipment distance write-back

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
