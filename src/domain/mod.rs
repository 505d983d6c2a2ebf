// Domain layer: plain result types and the ports (interfaces) the tools talk through.

pub mod model;
pub mod ports;
