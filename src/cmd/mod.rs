pub mod draw;
pub mod score;
