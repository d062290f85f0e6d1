pub mod scale;
pub mod series;
pub mod types;

pub use scale::LinearScale;
pub use series::{Series, SeriesId};
pub use types::{PixelPoint, PlotInsets, PlotRect, Sample, Viewport};
