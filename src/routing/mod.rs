//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation event (target path)
//!     → router.rs (state machine, history transitions)
//!     → table.rs (ordered lookup, first match wins)
//!     → matcher.rs (evaluate path pattern)
//!     → Return: RouteMatch or NotFound
//!     → component factory invoked for the matched record
//!
//! Route Compilation (at startup):
//!     RouteRecord[]
//!     → Compile patterns (static + :param segments)
//!     → Reject duplicates / malformed patterns
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by declaration)
//! - Explicit NotFound rather than silent default

pub mod history;
pub mod matcher;
pub mod router;
pub mod table;

pub use history::{History, HistoryEntry, HistoryMode, MemoryHistory, NavigationType};
pub use matcher::PathPattern;
pub use router::{Activation, NavigationError, NavigationPhase, NavigationState, Router};
pub use table::{ComponentFactory, RouteMatch, RouteRecord, RouteTable};
