//! Acceptance checks against a live juju controller
//!
//! Each check is a plain function over a `ModelClient`, so it runs the same
//! against a bootstrapped controller or the in-memory fake.

pub mod destroy_model;

pub use destroy_model::{assess_destroy_model, destroy_model, get_current_controller, switch_model};
