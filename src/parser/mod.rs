pub mod date;
pub mod parser;
pub mod types;

pub use date::*;
pub use parser::*;
pub use types::*;
