pub mod quote;
pub mod range;
pub mod series;
pub mod suggestion;
