use sigview_cursors::api::{CursorPlacementConfig, CursorStyle};
use sigview_cursors::core::{Sample, Series, SeriesId, Viewport};
use sigview_cursors::layout::LabelStackConfig;
use sigview_cursors::render::{Color, NullRenderer};
use sigview_cursors::surface::{Annotation, PlotSurface, SignalSurface};
use sigview_cursors::{CursorEngine, CursorEngineConfig, CursorError, CursorMode, CursorSlot};

#[test]
fn default_config_matches_documented_defaults() {
    let config = CursorEngineConfig::default().validate().expect("valid defaults");
    assert_eq!(config.key_label_decimals, 4);
    assert_eq!(config.value_label_decimals, 3);
    assert_eq!(config.placement.margin_ratio, 0.05);
    assert_eq!(config.placement.degenerate_margin, 0.1);
    assert_eq!(config.label_stack.label_height_px(), 16.0);
    assert_eq!(config.label_stack.vertical_gap_px, 2.0);
    assert_eq!(config.label_stack.horizontal_offset_px, 5.0);
}

#[test]
fn versioned_json_survives_a_round_trip() {
    let config = CursorEngineConfig::default()
        .with_label_decimals(2, 1)
        .with_cursor_styles(
            CursorStyle::new(Color::rgb(0.0, 0.0, 1.0)),
            CursorStyle::new(Color::rgb(1.0, 0.5, 0.0)),
        );
    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));

    let parsed = CursorEngineConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn bare_json_fills_missing_fields_with_defaults() {
    let parsed = CursorEngineConfig::from_json_str(r#"{ "key_label_decimals": 2 }"#)
        .expect("parse bare config");
    assert_eq!(parsed.key_label_decimals, 2);
    assert_eq!(parsed.value_label_decimals, 3);
    assert_eq!(parsed.label_stack, LabelStackConfig::default());
}

#[test]
fn unknown_schema_version_is_rejected() {
    let json = CursorEngineConfig::default()
        .to_json_pretty()
        .expect("serialize")
        .replace("\"schema_version\": 1", "\"schema_version\": 7");
    let err = CursorEngineConfig::from_json_str(&json).expect_err("unsupported version");
    assert!(matches!(err, CursorError::InvalidData(message) if message.contains("schema version")));
}

#[test]
fn malformed_json_is_rejected() {
    assert!(CursorEngineConfig::from_json_str("{ not json").is_err());
    assert!(CursorEngineConfig::from_json_str(r#"{ "tracer_size_px": -1.0 }"#).is_err());
}

#[test]
fn invalid_configs_fail_engine_construction() {
    let bad_margin = CursorEngineConfig::default().with_placement(CursorPlacementConfig {
        margin_ratio: 0.75,
        ..CursorPlacementConfig::default()
    });
    assert!(CursorEngine::<SignalSurface>::new(bad_margin).is_err());

    let bad_stack = CursorEngineConfig::default().with_label_stack(LabelStackConfig {
        text_height_px: f64::NAN,
        ..LabelStackConfig::default()
    });
    assert!(CursorEngine::<SignalSurface>::new(bad_stack).is_err());

    let zero_text = CursorEngineConfig::default().with_label_stack(LabelStackConfig {
        text_height_px: 0.0,
        padding_top_px: 4.0,
        padding_bottom_px: 4.0,
        ..LabelStackConfig::default()
    });
    assert!(CursorEngine::<SignalSurface>::new(zero_text).is_err());

    let bad_color = CursorEngineConfig::default().with_cursor_styles(
        CursorStyle::new(Color::rgb(2.0, 0.0, 0.0)),
        CursorStyle::new(Color::rgb(0.0, 1.0, 0.0)),
    );
    assert!(CursorEngine::<SignalSurface>::new(bad_color).is_err());
}

#[test]
fn label_precision_follows_config() {
    let mut engine: CursorEngine<SignalSurface> =
        CursorEngine::new(CursorEngineConfig::default().with_label_decimals(2, 1))
            .expect("engine init");
    let mut surface = SignalSurface::new("pane", Viewport::new(1000, 400), (0.0, 10.0), (0.0, 100.0))
        .expect("surface");
    surface.add_series(Series::new(
        SeriesId(1),
        "a",
        vec![Sample::new(0.0, 12.345), Sample::new(5.0, 67.891)],
    ));
    let id = engine.register_surface(surface);
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(2.5, CursorSlot::First);

    let surface = engine.surface(id).expect("surface");
    let cursor = engine.cursor(CursorSlot::First);
    let text = |handle: sigview_cursors::surface::HandleRef| {
        surface
            .annotation(handle.id)
            .and_then(Annotation::as_label)
            .map(|label| label.text.clone())
            .expect("label")
    };
    assert_eq!(text(cursor.x_label_handles()[0]), "2.50");
    let value_label = *cursor
        .value_label_handles()
        .values()
        .next()
        .expect("value label");
    assert_eq!(text(value_label), "12.3");
}

#[test]
fn cursor_modes_parse_from_action_names() {
    assert_eq!("double".parse::<CursorMode>().expect("parse"), CursorMode::Double);
    assert_eq!("Off".parse::<CursorMode>().expect("parse"), CursorMode::Off);
    assert!("triple".parse::<CursorMode>().is_err());
    assert_eq!(CursorMode::Single.to_string(), "single");
}

#[test]
fn every_accepted_label_geometry_renders() {
    let config = CursorEngineConfig::default().with_label_stack(LabelStackConfig {
        text_height_px: 1.0,
        padding_top_px: 0.0,
        padding_bottom_px: 0.0,
        vertical_gap_px: 0.0,
        horizontal_offset_px: 0.0,
    });
    let mut engine: CursorEngine<SignalSurface> = CursorEngine::new(config).expect("engine init");
    let mut surface = SignalSurface::new("pane", Viewport::new(1000, 400), (0.0, 10.0), (0.0, 100.0))
        .expect("surface");
    surface.add_series(Series::new(SeriesId(1), "a", vec![Sample::new(0.0, 50.0)]));
    let id = engine.register_surface(surface);
    engine.set_mode(CursorMode::Double);

    let mut renderer = NullRenderer::default();
    engine
        .surface_mut(id)
        .expect("surface")
        .render(&mut renderer)
        .expect("render accepted config");
    assert_eq!(renderer.last_texts().len(), 4);
}
