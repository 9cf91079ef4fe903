mod error;
pub mod rpc;
mod selfplay;
mod statistics;
mod tracker;
pub use error::*;
pub use selfplay::*;
pub use statistics::*;
pub use tracker::*;
