pub mod fragment;
pub mod look;
pub mod seed;

pub use fragment::*;
pub use look::*;
pub use seed::*;
