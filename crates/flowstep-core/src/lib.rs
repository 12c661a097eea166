pub mod driver;
pub mod error;
pub mod flow;

pub use driver::*;
pub use error::*;
pub use flow::*;
