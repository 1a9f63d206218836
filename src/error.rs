use crate::raster::Shape;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinchError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image Decoding Error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Incompatible image shapes: {left} vs {right}")]
    IncompatibleShapes { left: Shape, right: Shape },

    #[error("Unknown difference method '{0}'")]
    UnknownDifferenceMethod(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Display Error: {0}")]
    Display(String),

    #[error("Search Thread Error: {0}")]
    Search(String),
}

pub type FinchResult<T> = Result<T, FinchError>;
