pub mod eigen;
pub mod vector;
