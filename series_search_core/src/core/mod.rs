pub mod cancellation;
pub mod error;
pub mod range;
pub mod search;
pub mod series;
