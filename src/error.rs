use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Converter \"{0}\" is not registered.")]
    UnknownConverter(String),

    #[error("{0}")]
    ConversionFailed(String),
}
