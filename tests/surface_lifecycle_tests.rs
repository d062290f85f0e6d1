use sigview_cursors::core::{PixelPoint, Sample, Series, SeriesId, Viewport};
use sigview_cursors::surface::{Annotation, PlotSurface, SeriesKey, SignalSurface, SurfaceId};
use sigview_cursors::{CursorEngine, CursorEngineConfig, CursorError, CursorMode, CursorSlot};

fn pane(series_count: u64) -> SignalSurface {
    let mut surface = SignalSurface::new("pane", Viewport::new(1000, 400), (0.0, 10.0), (0.0, 100.0))
        .expect("valid surface");
    for id in 0..series_count {
        surface.add_series(Series::new(
            SeriesId(id),
            format!("s{id}"),
            vec![Sample::new(0.0, 10.0), Sample::new(10.0, 90.0)],
        ));
    }
    surface
}

fn engine() -> CursorEngine<SignalSurface> {
    CursorEngine::new(CursorEngineConfig::default()).expect("engine init")
}

fn line_x(engine: &CursorEngine<SignalSurface>, id: SurfaceId, slot: CursorSlot) -> Option<f64> {
    let surface = engine.surface(id)?;
    let handle = engine
        .cursor(slot)
        .line_handles()
        .iter()
        .find(|handle| handle.surface == id)?;
    surface
        .annotation(handle.id)
        .and_then(Annotation::as_line)
        .filter(|line| line.visible)
        .map(|line| line.x)
}

#[test]
fn late_surfaces_pick_up_the_current_cursor() {
    let mut engine = engine();
    engine.register_surface(pane(1));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(2.0, CursorSlot::First);

    let late = engine.register_surface(pane(2));
    assert_eq!(engine.cursor(CursorSlot::First).line_handles().len(), 2);
    assert_eq!(engine.surface(late).expect("late").annotation_count(), 6);
    let x = line_x(&engine, late, CursorSlot::First).expect("visible line");
    assert!((x - 200.0).abs() <= 1e-9);
    assert_eq!(engine.cursor_key(CursorSlot::First), 2.0);
}

#[test]
fn removing_a_surface_releases_its_annotations() {
    let mut engine = engine();
    let top = engine.register_surface(pane(2));
    let bottom = engine.register_surface(pane(1));
    engine.set_mode(CursorMode::Double);
    assert_eq!(engine.surface(top).expect("top").annotation_count(), 12);

    let removed = engine.remove_surface(top).expect("removed surface");
    assert_eq!(removed.annotation_count(), 0);
    assert_eq!(engine.surface_count(), 1);
    assert_eq!(engine.surface(bottom).expect("bottom").annotation_count(), 8);
    for slot in CursorSlot::ALL {
        let cursor = engine.cursor(slot);
        assert!(cursor.line_handles().iter().all(|handle| handle.surface == bottom));
        assert!(cursor.series_tracers().keys().all(|key| key.surface == bottom));
    }

    assert!(engine.remove_surface(top).is_none());
}

#[test]
fn removing_the_dragged_surface_ends_the_drag() {
    let mut engine = engine();
    let top = engine.register_surface(pane(0));
    engine.register_surface(pane(0));
    engine.set_mode(CursorMode::Single);
    assert!(engine.on_pointer_press(top, PixelPoint::new(50.0, 100.0)).consumed);

    let removed = engine.remove_surface(top).expect("removed surface");
    assert!(removed.pan_zoom_enabled());
    assert_eq!(engine.dragging_slot(), None);
    assert_eq!(engine.active_surface(), None);
}

#[test]
fn series_changes_rebuild_tracers() {
    let mut engine = engine();
    let id = engine.register_surface(pane(1));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(5.0, CursorSlot::First);

    engine.surface_mut(id).expect("surface").add_series(Series::new(
        SeriesId(7),
        "late",
        vec![Sample::new(2.0, 40.0)],
    ));
    engine.surfaces_changed();

    let key = SeriesKey {
        surface: id,
        series: SeriesId(7),
    };
    let tracer = engine.cursor(CursorSlot::First).series_tracers()[&key];
    let annotation = engine
        .surface(id)
        .expect("surface")
        .annotation(tracer.id)
        .and_then(Annotation::as_tracer)
        .expect("tracer");
    assert!(annotation.visible);
    assert_eq!(annotation.value, 40.0);
}

#[test]
fn range_changes_move_lines_after_refresh() {
    let mut engine = engine();
    let id = engine.register_surface(pane(0));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(5.0, CursorSlot::First);
    assert_eq!(line_x(&engine, id, CursorSlot::First), Some(500.0));

    engine
        .surface_mut(id)
        .expect("surface")
        .set_visible_range(5.0, 15.0)
        .expect("range");
    engine.surfaces_changed();
    assert_eq!(line_x(&engine, id, CursorSlot::First), Some(0.0));
}

#[test]
fn active_surface_must_be_registered() {
    let mut engine = engine();
    let id = engine.register_surface(pane(0));
    engine.set_active_surface(id).expect("known surface");
    assert_eq!(engine.active_surface(), Some(id));

    let err = engine.set_active_surface(SurfaceId(99)).expect_err("unknown surface");
    assert!(matches!(err, CursorError::UnknownSurface(99)));
}
