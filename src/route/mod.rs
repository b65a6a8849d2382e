mod error;
mod resolver;
mod types;

pub use error::RouteError;
pub use resolver::{FirstStop, StartIndexResolver, StartIndexStrategy, TrailingDigit};
pub use types::{Route, RouteConfig, Stop};
