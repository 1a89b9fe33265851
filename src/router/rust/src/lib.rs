/* src/router/rust/src/lib.rs */

//! Pure state machines backing the client router: template/data
//! registry, navigation lifecycle, prefetch scheduling, and scroll
//! decisions. All I/O (fetching, DOM, history) stays with the host.

mod navigate;
mod prefetch;
mod registry;
mod scroll;

pub use navigate::{NavigationOutcome, NavigationPlan, Navigator};
pub use prefetch::{PrefetchQueue, Priority};
pub use registry::{Bootstrap, ClientRegistry, RouteProps};
pub use scroll::{ScrollAction, ScrollController};
