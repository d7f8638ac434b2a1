//! # Registry Library
//!
//! Companies, the machines they own and the documents attached to those
//! machines, served as server-driven pages over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub mod validation;
pub use migration;
