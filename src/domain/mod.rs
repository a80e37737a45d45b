// Domain layer: report models, scenarios and ports (interfaces).

pub mod model;
pub mod ports;
pub mod scenario;
