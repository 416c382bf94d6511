pub mod cuboids;
pub mod points;
