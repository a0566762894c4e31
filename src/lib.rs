//! Payroll computation engine for Philippine HR systems.
//!
//! This crate implements the Daily Time Record (DTR) calculation engine,
//! the payroll period and payroll entry status state machines, and the
//! statutory contribution calculators (SSS, PhilHealth, Pag-IBIG and
//! withholding tax) that sit behind an HR/payroll web application.
//!
//! The web layer (routing, authentication, response serialization) is out
//! of scope; it is expected to call [`engine::PayrollEngine`], which exposes
//! every engine operation with an explicit tenant parameter.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod contributions;
pub mod engine;
pub mod error;
pub mod models;
pub mod money;
pub mod payroll;
pub mod store;
