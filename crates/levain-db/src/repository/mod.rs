//! # Repository Modules
//!
//! One repository per aggregate:
//!
//! - [`product`] - Catalog CRUD, search, stock receiving, archival
//! - [`sale`] - Transactional checkout recording, receipt reads
//! - [`analytics`] - Read-only aggregation for reports and the forecast
//! - [`user`] - Staff accounts
//! - [`login`] - Login/logout audit trail

pub mod analytics;
pub mod login;
pub mod product;
pub mod sale;
pub mod user;
