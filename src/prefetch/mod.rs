//! Prefetch Module
//!
//! Background cache warming for resources the user is likely to request next.

mod calendar;
mod queue;

pub use calendar::{adjacent_months, calendar_url};
pub use queue::{PrefetchQueue, PrefetchRequest, DEFAULT_PREFETCH_DELAY};
