pub mod brush;
pub mod config;
pub mod coordination;
pub mod display;
pub mod error;
pub mod fitness;
pub mod optimizer;
pub mod raster;
pub mod specimen;
