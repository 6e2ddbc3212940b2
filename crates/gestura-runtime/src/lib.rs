//! Gestura Runtime - Translation loop orchestration
//!
//! Each tick runs the same stages:
//! 1. Check the translating gate
//! 2. Report hand presence
//! 3. Select one hand from the frame
//! 4. Validate it into a 21-point pose
//! 5. Classify
//! 6. Debounce against the held label
//! 7. On a change: record history, display, speak

pub mod config;
pub mod driver;
pub mod prediction;
pub mod session;
pub mod sink;
pub mod telemetry;
pub mod translator;

pub use config::*;
pub use driver::*;
pub use prediction::*;
pub use session::*;
pub use sink::*;
pub use telemetry::*;
pub use translator::*;
