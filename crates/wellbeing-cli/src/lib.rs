//! Library side of the `wellbeing` command-line harness.

pub mod harness;
pub mod logging;
