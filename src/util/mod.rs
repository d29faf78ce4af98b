pub use num_traits::Num;

pub trait NumTrait: Num + Copy + Send + Sync {}

impl<T: Num + Copy + Send + Sync> NumTrait for T {}

pub mod indexing;
pub use indexing::*;
