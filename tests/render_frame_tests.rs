use sigview_cursors::core::{Sample, Series, SeriesId, Viewport};
use sigview_cursors::render::{
    Color, LinePrimitive, NullRenderer, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};
use sigview_cursors::surface::SignalSurface;
use sigview_cursors::{CursorEngine, CursorEngineConfig, CursorMode, CursorSlot};

fn engine_with_pane() -> (CursorEngine<SignalSurface>, sigview_cursors::surface::SurfaceId) {
    let mut surface = SignalSurface::new("pane", Viewport::new(800, 300), (0.0, 4.0), (0.0, 40.0))
        .expect("valid surface");
    surface.add_series(Series::new(
        SeriesId(1),
        "a",
        (0..5)
            .map(|i| Sample::new(f64::from(i), f64::from(i) * 10.0))
            .collect(),
    ));
    let mut engine = CursorEngine::new(CursorEngineConfig::default()).expect("engine init");
    let id = engine.register_surface(surface);
    (engine, id)
}

#[test]
fn frame_without_cursors_draws_only_series() {
    let (mut engine, id) = engine_with_pane();
    let mut renderer = NullRenderer::default();
    engine
        .surface_mut(id)
        .expect("surface")
        .render(&mut renderer)
        .expect("render");

    let frame = renderer.last_frame.as_ref().expect("frame");
    assert_eq!(frame.lines.len(), 4);
    assert!(frame.texts.is_empty());
    assert!(frame.rects.is_empty());
}

#[test]
fn frame_with_two_cursors_draws_lines_tracers_and_labels() {
    let (mut engine, id) = engine_with_pane();
    engine.set_mode(CursorMode::Double);
    engine.update_cursor_key(1.0, CursorSlot::First);
    engine.update_cursor_key(3.0, CursorSlot::Second);

    let mut renderer = NullRenderer::default();
    let surface = engine.surface_mut(id).expect("surface");
    assert!(surface.needs_redraw());
    surface.render(&mut renderer).expect("render");
    assert!(!surface.needs_redraw());
    assert_eq!(renderer.frames_rendered, 1);

    let frame = renderer.last_frame.as_ref().expect("frame");
    // 4 series segments + 2 cursor lines
    assert_eq!(frame.lines.len(), 6);
    // per cursor: tracer + key label background + value label background
    assert_eq!(frame.rects.len(), 6);

    let mut texts = renderer.last_texts();
    texts.sort_unstable();
    assert_eq!(texts, vec!["1.0000", "10.000", "3.0000", "30.000"]);
}

#[test]
fn null_renderer_rejects_undrawable_primitives() {
    let color = Color::rgb(0.2, 0.2, 0.2);
    let mut renderer = NullRenderer::default();

    let mut frame = RenderFrame::new(Viewport::new(100, 100));
    frame.push_line(LinePrimitive::new(0.0, 0.0, f64::NAN, 10.0, 1.0, color));
    assert!(renderer.render(&frame).is_err());

    let mut frame = RenderFrame::new(Viewport::new(100, 100));
    frame.push_rect(RectPrimitive::new(0.0, 0.0, -1.0, 4.0, color));
    assert!(renderer.render(&frame).is_err());

    let mut frame = RenderFrame::new(Viewport::new(100, 100));
    frame.push_text(TextPrimitive::new("", 1.0, 1.0, 12.0, color, TextHAlign::Left));
    assert!(renderer.render(&frame).is_err());

    let mut frame = RenderFrame::new(Viewport::new(100, 100));
    frame.push_text(TextPrimitive::new(
        "x",
        1.0,
        1.0,
        12.0,
        color.with_alpha(1.5),
        TextHAlign::Left,
    ));
    assert!(renderer.render(&frame).is_err());

    assert_eq!(renderer.frames_rendered, 0);
    assert!(renderer.last_frame.is_none());
}
