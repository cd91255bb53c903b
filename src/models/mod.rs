//! Data models for p12-installer
//!
//! This module contains the data structures passed between the installation
//! steps.

pub mod certificate;
pub mod installation;
pub mod outcome;
pub mod pem_collection;

pub use certificate::CertificateValidity;
pub use installation::{Installation, DEFAULT_RENEW_BEFORE};
pub use outcome::{BackupOutcome, CheckOutcome, CycleAction, CycleReport, InstructionOutput};
pub use pem_collection::PemCollection;
