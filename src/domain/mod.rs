// Domain layer: preference models and the ports the service depends on.

pub mod model;
pub mod ports;
