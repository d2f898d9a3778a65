pub mod set_pool_allow_swap;
pub mod set_pool_allow_trade;
pub mod set_pool_aum_soft_cap;
pub mod set_pool_liquidity_state;

pub use set_pool_allow_swap::*;
pub use set_pool_allow_trade::*;
pub use set_pool_aum_soft_cap::*;
pub use set_pool_liquidity_state::*;
