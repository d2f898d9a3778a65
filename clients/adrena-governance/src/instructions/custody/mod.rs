pub mod add_custody;
pub mod custody_params;
pub mod set_custody_allow_swap;
pub mod set_custody_allow_trade;
pub mod set_custody_config;
pub mod set_custody_max_cumulative_short_size;

pub use add_custody::*;
pub use custody_params::*;
pub use set_custody_allow_swap::*;
pub use set_custody_allow_trade::*;
pub use set_custody_config::*;
pub use set_custody_max_cumulative_short_size::*;
