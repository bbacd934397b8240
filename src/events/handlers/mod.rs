// src/events/handlers/mod.rs
//
// Event handlers - closure-based subscription via EventBus::subscribe.
// Only the registration functions are exported.

pub mod recompute_handler;

pub use recompute_handler::register_recompute_handlers;
