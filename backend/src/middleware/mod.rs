//! Request middleware shared by every route.
//!
//! [`Trace`] gives each request a correlation id that appears in its log
//! lines, its error bodies and the `trace-id` response header.

pub mod trace;

pub use trace::Trace;
