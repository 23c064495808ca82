pub mod energy;
pub mod orientation;
pub mod series;
