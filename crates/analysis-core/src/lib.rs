pub mod error;
pub mod grid;
pub mod series;
pub mod types;

pub use error::*;
pub use grid::*;
pub use series::*;
pub use types::*;
