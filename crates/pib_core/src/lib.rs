pub mod cache;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod profiles;
