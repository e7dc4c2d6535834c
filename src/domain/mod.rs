// Domain layer: roster and team models plus the store port. Nothing here does I/O.

pub mod model;
pub mod ports;
