pub mod genesis_otc_in;
pub mod genesis_otc_out;

pub use genesis_otc_in::*;
pub use genesis_otc_out::*;
