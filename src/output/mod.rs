//! Output formatting module
//!
//! Terminal and JSON rendering of installer results.

pub mod json;
pub mod terminal;

pub use json::{print_json, CheckJson, InspectJson};
pub use terminal::{
    print_backup_outcome, print_certificate, print_check_outcome, print_cycle_event,
    print_cycle_summary, print_header, print_info, print_success, print_warning,
};
