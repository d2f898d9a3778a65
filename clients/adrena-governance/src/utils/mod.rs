pub mod math_utils;
pub mod token_utils;

pub use math_utils::*;
pub use token_utils::*;
