//! Reporting Service - Invoice ledger and monthly report engine.

pub mod config;
pub mod engine;
pub mod http;
pub mod models;
pub mod services;
pub mod startup;
