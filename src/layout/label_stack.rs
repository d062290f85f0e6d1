use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{CursorError, CursorResult};

/// Geometry shared by every value label of one cursor on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStackConfig {
    pub text_height_px: f64,
    pub padding_top_px: f64,
    pub padding_bottom_px: f64,
    pub vertical_gap_px: f64,
    pub horizontal_offset_px: f64,
}

impl Default for LabelStackConfig {
    fn default() -> Self {
        Self {
            text_height_px: 12.0,
            padding_top_px: 2.0,
            padding_bottom_px: 2.0,
            vertical_gap_px: 2.0,
            horizontal_offset_px: 5.0,
        }
    }
}

impl LabelStackConfig {
    pub fn validate(self) -> CursorResult<Self> {
        for (value, name) in [
            (self.text_height_px, "text_height_px"),
            (self.padding_top_px, "padding_top_px"),
            (self.padding_bottom_px, "padding_bottom_px"),
            (self.vertical_gap_px, "vertical_gap_px"),
            (self.horizontal_offset_px, "horizontal_offset_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CursorError::InvalidData(format!(
                    "label stack config `{name}` must be finite and >= 0"
                )));
            }
        }
        if self.text_height_px <= 0.0 {
            return Err(CursorError::InvalidData(
                "label stack config `text_height_px` must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn label_height_px(self) -> f64 {
        self.text_height_px + self.padding_top_px + self.padding_bottom_px
    }
}

/// Pixel offset of a label's center from its tracer anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOffset {
    pub dx: f64,
    pub dy: f64,
}

/// Resolves vertical offsets so no two labels overlap.
///
/// `tracer_ys` holds each label's anchor y in surface pixels (0 = top). The
/// result is index-aligned with the input. Labels are swept top to bottom and
/// a label is only ever pushed below its predecessor; space freed above a
/// pushed label is never reclaimed by later labels.
#[must_use]
pub fn resolve_label_stack(tracer_ys: &[f64], config: LabelStackConfig) -> Vec<LabelOffset> {
    let resting = LabelOffset {
        dx: config.horizontal_offset_px,
        dy: 0.0,
    };
    let mut offsets = vec![resting; tracer_ys.len()];
    if tracer_ys.len() < 2 {
        return offsets;
    }

    let mut order: Vec<usize> = (0..tracer_ys.len())
        .filter(|&index| tracer_ys[index].is_finite())
        .collect();
    order.sort_by_key(|&index| (OrderedFloat(tracer_ys[index]), index));

    let label_height = config.label_height_px();
    let half_height = 0.5 * label_height;
    let mut last_bottom = f64::MIN / 2.0;

    for index in order {
        let tracer_y = tracer_ys[index];
        let ideal_top = tracer_y - half_height;
        if ideal_top < last_bottom + config.vertical_gap_px {
            let new_top = last_bottom + config.vertical_gap_px;
            offsets[index].dy = (new_top + half_height) - tracer_y;
            last_bottom = new_top + label_height;
        } else {
            last_bottom = ideal_top + label_height;
        }
    }

    offsets
}
