use serde::{Deserialize, Serialize};

use crate::error::{CursorError, CursorResult};

/// Affine mapping between a domain interval and a pixel interval.
///
/// The pixel interval is passed per call so the same scale can serve an
/// x axis (`left..right`) or an inverted y axis (`bottom..top`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> CursorResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(CursorError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    pub fn domain_to_pixel(self, value: f64, pixel_start: f64, pixel_end: f64) -> CursorResult<f64> {
        if !value.is_finite() {
            return Err(CursorError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / self.span();
        Ok(pixel_start + normalized * (pixel_end - pixel_start))
    }

    pub fn pixel_to_domain(self, pixel: f64, pixel_start: f64, pixel_end: f64) -> CursorResult<f64> {
        if !pixel.is_finite() {
            return Err(CursorError::InvalidData("pixel must be finite".to_owned()));
        }
        let pixel_span = pixel_end - pixel_start;
        if pixel_span == 0.0 {
            return Err(CursorError::InvalidData(
                "pixel span must be non-zero".to_owned(),
            ));
        }

        let normalized = (pixel - pixel_start) / pixel_span;
        Ok(self.domain_start + normalized * self.span())
    }

    /// Shifts the domain by `delta` domain units.
    pub fn pan(&mut self, delta: f64) -> CursorResult<()> {
        if !delta.is_finite() {
            return Err(CursorError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }
        self.domain_start += delta;
        self.domain_end += delta;
        Ok(())
    }

    /// Scales the domain around `anchor`; `factor < 1` zooms in.
    pub fn zoom_around(&mut self, anchor: f64, factor: f64) -> CursorResult<()> {
        if !anchor.is_finite() || !factor.is_finite() || factor <= 0.0 {
            return Err(CursorError::InvalidData(
                "zoom anchor must be finite and factor must be finite and > 0".to_owned(),
            ));
        }
        let start = anchor + (self.domain_start - anchor) * factor;
        let end = anchor + (self.domain_end - anchor) * factor;
        *self = Self::new(start, end)?;
        Ok(())
    }
}
