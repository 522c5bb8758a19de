// Domain layer: models, events and ports (interfaces). Adapters live under src/adapters.

pub mod events;
pub mod model;
pub mod ports;
