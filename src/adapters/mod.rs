// Adapters layer: concrete implementations for the external systems the
// domain ports describe (score store, hint oracle).

pub mod hint;
pub mod score_store;
