//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     Dispatcher::register
//!     → router.rs handle_func(method, path, handler)
//!     → Freeze: Router moved behind Arc, read-only from here on
//!
//! Incoming Request (method, path)
//!     → router.rs (path lookup, then method lookup)
//!     → Return: Handled, NotFound or MethodNotAllowed
//! ```
//!
//! # Design Decisions
//! - Exact path match only, no patterns or parameters
//! - Unknown path and known path with wrong method are distinct outcomes
//! - Immutable after startup (thread-safe without locks)

pub mod router;

pub use router::{HandlerFunc, RouteOutcome, Router};
