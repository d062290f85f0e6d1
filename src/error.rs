use thiserror::Error;

pub type CursorResult<T> = Result<T, CursorError>;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown surface id: {0}")]
    UnknownSurface(u64),

    #[error("observer id `{0}` is already registered")]
    DuplicateObserver(String),
}
