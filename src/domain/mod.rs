// Domain layer: core models and ports (interfaces) for the external
// collaborators: display sink, score store, hint oracle.

pub mod model;
pub mod ports;
