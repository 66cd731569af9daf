use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input contained something other than `'0'` or `'1'`.
    #[error("invalid signal: {found:?} at position {position}")]
    InvalidInput { position: usize, found: char },

    /// Previous symbol code outside `00..=11`.
    #[error("invalid encoder state: previous symbol code {0:#04b}")]
    InvalidState(u8),

    /// Plot dimensions overflow or exceed the pixel budget.
    #[error("waveform of {samples} samples is too large to render")]
    PlotTooLarge { samples: usize },

    #[error("waveform image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
