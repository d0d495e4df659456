//! Port traits between the domain and the outside world.

pub mod cashflow_port;
pub mod config_port;
pub mod projection_port;
