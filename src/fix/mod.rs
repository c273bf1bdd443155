//! Fix recommendations for circular dependencies.
//!
//! Each cycle flows through the same stages:
//!
//! ```text
//!   cycle + root cause ──► FixStrategyGenerator ──► strategies
//!                                                     │
//!                          FixGuideGenerator ◄────────┤  numbered steps
//!                          BeforeAfterGenerator ◄─────┘  diagrams, warnings
//!
//!   all cycles ──► ResultEnricher ──► quick fixes, priorities, FixSummary
//! ```

mod before_after;
mod enricher;
mod guide;
mod strategy;

pub use before_after::BeforeAfterGenerator;
pub use enricher::{band_minutes, ResultEnricher, DEFAULT_CYCLE_MINUTES};
pub use guide::FixGuideGenerator;
pub use strategy::{effort_time, FixStrategyGenerator, WORKSPACE_RANGE};
