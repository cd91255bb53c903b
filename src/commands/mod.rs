//! Command implementations for p12-installer

pub mod backup;
pub mod check;
pub mod inspect;
pub mod install;
pub mod password;
pub mod run;

pub use backup::run_backup;
pub use check::run_check;
pub use inspect::run_inspect;
pub use install::run_install;
pub use run::run_config;
