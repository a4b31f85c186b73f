//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Pardon, schedule and recomputation commands
pub mod manage;

/// Clock-in, lunch and clock-out commands
pub mod punch;

/// Summary, heatmap and period commands
pub mod report;

// Export commands
pub use general::*;
pub use manage::*;
pub use punch::*;
pub use report::*;
