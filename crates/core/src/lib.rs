pub mod assessment;
pub mod cluster;
pub mod config;
pub mod creative;
pub mod error;
pub mod metric;
pub mod strategy;

pub use assessment::*;
pub use cluster::*;
pub use config::Config;
pub use creative::*;
pub use error::*;
pub use metric::*;
pub use strategy::*;
