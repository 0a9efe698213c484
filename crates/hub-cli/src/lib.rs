//! Library components of the `hubdash` command-line tool.

pub mod logging;
pub mod pipeline;
pub mod types;
