use serde::{Deserialize, Serialize};

use crate::error::{CursorError, CursorResult};
use crate::layout::LabelStackConfig;
use crate::render::{Color, TextHAlign};
use crate::surface::{LabelStyle, LineStyle};

pub const ENGINE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Where freshly activated cursors land inside the reference surface range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPlacementConfig {
    /// Inset from the visible range edges, as a fraction of its width.
    pub margin_ratio: f64,
    /// Margin used when the range is degenerate or no surface exists.
    pub degenerate_margin: f64,
    /// Fallback distance of cursor 2 from cursor 1, as a fraction of the width.
    pub second_cursor_step_ratio: f64,
}

impl Default for CursorPlacementConfig {
    fn default() -> Self {
        Self {
            margin_ratio: 0.05,
            degenerate_margin: 0.1,
            second_cursor_step_ratio: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorStyle {
    pub line_color: Color,
    pub line_width: f64,
    pub label_text_color: Color,
    pub label_background: Color,
}

impl CursorStyle {
    #[must_use]
    pub fn new(line_color: Color) -> Self {
        Self {
            line_color,
            line_width: 1.0,
            label_text_color: Color::rgb(1.0, 1.0, 1.0),
            label_background: line_color.with_alpha(0.85),
        }
    }
}

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist cursor tuning next to their own
/// settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorEngineConfig {
    #[serde(default)]
    pub placement: CursorPlacementConfig,
    #[serde(default = "default_key_label_decimals")]
    pub key_label_decimals: usize,
    #[serde(default = "default_value_label_decimals")]
    pub value_label_decimals: usize,
    #[serde(default)]
    pub label_stack: LabelStackConfig,
    #[serde(default = "default_label_padding_horizontal_px")]
    pub label_padding_horizontal_px: f64,
    #[serde(default = "default_tracer_size_px")]
    pub tracer_size_px: f64,
    #[serde(default = "default_cursor_styles")]
    pub cursor_styles: [CursorStyle; 2],
}

impl Default for CursorEngineConfig {
    fn default() -> Self {
        Self {
            placement: CursorPlacementConfig::default(),
            key_label_decimals: default_key_label_decimals(),
            value_label_decimals: default_value_label_decimals(),
            label_stack: LabelStackConfig::default(),
            label_padding_horizontal_px: default_label_padding_horizontal_px(),
            tracer_size_px: default_tracer_size_px(),
            cursor_styles: default_cursor_styles(),
        }
    }
}

impl CursorEngineConfig {
    #[must_use]
    pub fn with_placement(mut self, placement: CursorPlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_label_decimals(mut self, key_decimals: usize, value_decimals: usize) -> Self {
        self.key_label_decimals = key_decimals;
        self.value_label_decimals = value_decimals;
        self
    }

    #[must_use]
    pub fn with_label_stack(mut self, label_stack: LabelStackConfig) -> Self {
        self.label_stack = label_stack;
        self
    }

    #[must_use]
    pub fn with_cursor_styles(mut self, first: CursorStyle, second: CursorStyle) -> Self {
        self.cursor_styles = [first, second];
        self
    }

    pub fn validate(self) -> CursorResult<Self> {
        let placement = self.placement;
        for (value, name) in [
            (placement.margin_ratio, "margin_ratio"),
            (placement.second_cursor_step_ratio, "second_cursor_step_ratio"),
        ] {
            if !value.is_finite() || !(0.0..0.5).contains(&value) {
                return Err(CursorError::InvalidData(format!(
                    "placement `{name}` must be finite and in [0, 0.5)"
                )));
            }
        }
        if !placement.degenerate_margin.is_finite() || placement.degenerate_margin <= 0.0 {
            return Err(CursorError::InvalidData(
                "placement `degenerate_margin` must be finite and > 0".to_owned(),
            ));
        }

        if self.key_label_decimals > 12 || self.value_label_decimals > 12 {
            return Err(CursorError::InvalidData(
                "label decimal precision must be <= 12".to_owned(),
            ));
        }

        self.label_stack.validate()?;

        if !self.label_padding_horizontal_px.is_finite() || self.label_padding_horizontal_px < 0.0
        {
            return Err(CursorError::InvalidData(
                "label horizontal padding must be finite and >= 0".to_owned(),
            ));
        }
        if !self.tracer_size_px.is_finite() || self.tracer_size_px <= 0.0 {
            return Err(CursorError::InvalidData(
                "tracer size must be finite and > 0".to_owned(),
            ));
        }

        for style in self.cursor_styles {
            if !style.line_width.is_finite() || style.line_width <= 0.0 {
                return Err(CursorError::InvalidData(
                    "cursor line width must be finite and > 0".to_owned(),
                ));
            }
            style.line_color.validate()?;
            style.label_text_color.validate()?;
            style.label_background.validate()?;
        }

        Ok(self)
    }

    pub fn to_json_pretty(&self) -> CursorResult<String> {
        let payload = EngineConfigJsonContractV1 {
            schema_version: ENGINE_CONFIG_JSON_SCHEMA_V1,
            config: *self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            CursorError::InvalidData(format!("failed to serialize engine config: {e}"))
        })
    }

    /// Parses either a versioned contract payload or a bare config object.
    pub fn from_json_str(input: &str) -> CursorResult<Self> {
        if let Ok(payload) = serde_json::from_str::<EngineConfigJsonContractV1>(input) {
            if payload.schema_version != ENGINE_CONFIG_JSON_SCHEMA_V1 {
                return Err(CursorError::InvalidData(format!(
                    "unsupported engine config schema version: {}",
                    payload.schema_version
                )));
            }
            return payload.config.validate();
        }
        let config: CursorEngineConfig = serde_json::from_str(input).map_err(|e| {
            CursorError::InvalidData(format!("failed to parse engine config json: {e}"))
        })?;
        config.validate()
    }

    pub(crate) fn line_style(&self, position: usize) -> LineStyle {
        let style = self.cursor_styles[position];
        LineStyle {
            color: style.line_color,
            width: style.line_width,
        }
    }

    pub(crate) fn label_style(&self, position: usize, h_align: TextHAlign) -> LabelStyle {
        let style = self.cursor_styles[position];
        LabelStyle {
            font_size_px: self.label_stack.text_height_px,
            padding_top_px: self.label_stack.padding_top_px,
            padding_bottom_px: self.label_stack.padding_bottom_px,
            padding_horizontal_px: self.label_padding_horizontal_px,
            text_color: style.label_text_color,
            background: style.label_background,
            h_align,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: CursorEngineConfig,
}

fn default_key_label_decimals() -> usize {
    4
}

fn default_value_label_decimals() -> usize {
    3
}

fn default_label_padding_horizontal_px() -> f64 {
    3.0
}

fn default_tracer_size_px() -> f64 {
    7.0
}

fn default_cursor_styles() -> [CursorStyle; 2] {
    [
        CursorStyle::new(Color::rgb(0.85, 0.16, 0.16)),
        CursorStyle::new(Color::rgb(0.13, 0.55, 0.13)),
    ]
}
