// Domain layer: resource models and the configuration port. No HTTP here.

pub mod model;
pub mod ports;
