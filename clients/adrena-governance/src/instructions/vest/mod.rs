pub mod add_vest;
pub mod mint_lm_tokens_from_bucket;

pub use add_vest::*;
pub use mint_lm_tokens_from_bucket::*;
