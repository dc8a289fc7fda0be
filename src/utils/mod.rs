pub mod math;
pub mod sort;
