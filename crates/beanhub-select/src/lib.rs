//! Bean-of-the-day selection for the BeanHub catalog service.
//!
//! Two pieces live here:
//!
//! - [`SelectionStrategy`] / [`RandomSelectionStrategy`]: the pure rule that
//!   picks today's bean from the available candidates, never repeating the
//!   previous day's pick.
//! - [`SelectionService`]: the orchestration around the stores, idempotent
//!   per UTC calendar day. Exactly one selection row is persisted per date
//!   no matter how many callers race for the first request of the day; a
//!   caller that loses the insert race re-reads and returns the winner's
//!   bean.

pub mod service;
pub mod strategy;

pub use service::SelectionService;
pub use strategy::{DynSelectionStrategy, RandomSelectionStrategy, SelectionStrategy};
