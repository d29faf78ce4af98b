pub mod args;
pub mod build_info;
pub mod driver;
pub mod error;
pub mod grid;
pub mod image;
pub mod initial_conditions;
pub mod manifest;
pub mod par_slice;
pub mod plate;
pub mod report;
pub mod snapshot;
pub mod solver;
pub mod util;

pub use error::{Error, Result};
