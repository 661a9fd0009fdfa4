//! ofd-ya library
//!
//! This crate provides the core functionality for the `ofd-ya` binary: a client
//! for the OFD-Ya fiscal data operator that turns a day of fiscal documents
//! into normalized receipts.
//!
//! ## Overview
//!
//! - [`upstream`] - HTTP access to the register, document and cheque link endpoints
//! - [`collector`] - Receipt collection across every register of the account
//! - [`models`] - Normalized receipts, products and registers
//! - [`config`] - Client configuration and TOML loading
//! - [`cli`] - Command-line interface
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use ofd_ya::{errors::AppResult, upstream::OfdClient};
//!
//! # async fn example() -> AppResult<()> {
//! let client = OfdClient::new("my-token")?;
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//!
//! let batch = client.collect_receipts(date).await;
//! for receipt in &batch.receipts {
//!     println!("{} {} {}", receipt.fd, receipt.price, receipt.link);
//! }
//! if let Some(e) = batch.error {
//!     eprintln!("incomplete: {e}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod upstream;
pub mod utils;
