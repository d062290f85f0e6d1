use sigview_cursors::core::{Sample, Series, SeriesId, Viewport};
use sigview_cursors::surface::{PlotSurface, SignalSurface};
use sigview_cursors::{CursorEngine, CursorEngineConfig, CursorMode, CursorSlot};

fn empty_surface(key_range: (f64, f64)) -> SignalSurface {
    SignalSurface::new("pane", Viewport::new(1000, 400), key_range, (0.0, 100.0))
        .expect("valid surface")
}

fn engine() -> CursorEngine<SignalSurface> {
    CursorEngine::new(CursorEngineConfig::default()).expect("engine init")
}

fn two_series_surface() -> SignalSurface {
    let mut surface = empty_surface((0.0, 10.0));
    surface.add_series(Series::new(
        SeriesId(1),
        "a",
        vec![Sample::new(0.0, 1.0), Sample::new(0.4, 2.0), Sample::new(3.0, 3.0)],
    ));
    surface.add_series(Series::new(
        SeriesId(2),
        "b",
        vec![Sample::new(8.0, 1.0), Sample::new(9.7, 2.0)],
    ));
    surface
}

#[test]
fn entering_single_places_cursor_inside_left_margin() {
    let mut engine = engine();
    engine.register_surface(empty_surface((0.0, 10.0)));

    assert!(engine.set_mode(CursorMode::Single));
    assert_eq!(engine.mode(), CursorMode::Single);
    assert!((engine.cursor_key(CursorSlot::First) - 0.5).abs() <= 1e-12);
}

#[test]
fn initial_placement_snaps_to_reference_surface_samples() {
    let mut engine = engine();
    engine.register_surface(two_series_surface());

    engine.set_mode(CursorMode::Double);
    assert_eq!(engine.cursor_key(CursorSlot::First), 0.4);
    assert_eq!(engine.cursor_key(CursorSlot::Second), 9.7);
}

#[test]
fn entering_double_from_off_uses_both_margins() {
    let mut engine = engine();
    engine.register_surface(empty_surface((-20.0, 20.0)));

    engine.set_mode(CursorMode::Double);
    assert!((engine.cursor_key(CursorSlot::First) + 18.0).abs() <= 1e-12);
    assert!((engine.cursor_key(CursorSlot::Second) - 18.0).abs() <= 1e-12);
}

#[test]
fn single_to_double_keeps_first_cursor() {
    let mut engine = engine();
    engine.register_surface(empty_surface((0.0, 10.0)));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(3.25, CursorSlot::First);

    engine.set_mode(CursorMode::Double);
    assert_eq!(engine.cursor_key(CursorSlot::First), 3.25);
    assert!((engine.cursor_key(CursorSlot::Second) - 9.5).abs() <= 1e-12);
}

#[test]
fn crowded_second_cursor_falls_back_to_midpoint() {
    let mut engine = engine();
    engine.register_surface(empty_surface((0.0, 10.0)));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(9.2, CursorSlot::First);

    engine.set_mode(CursorMode::Double);
    // 9.5 is within margin of 9.2, 9.2 + 1.0 overshoots 10, so use (9.2 + 10) / 2.
    assert!((engine.cursor_key(CursorSlot::Second) - 9.6).abs() <= 1e-12);
}

#[test]
fn crowded_second_cursor_steps_by_tenth_of_range() {
    let mut engine = engine();
    engine.register_surface(empty_surface((0.0, 10.0)));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(9.0, CursorSlot::First);

    engine.set_mode(CursorMode::Double);
    // 9.5 is within margin of 9.0, 9.0 + 1.0 lands exactly on the upper edge.
    assert!((engine.cursor_key(CursorSlot::Second) - 10.0).abs() <= 1e-12);
}

#[test]
fn repeated_mode_is_a_no_op() {
    let mut engine = engine();
    let id = engine.register_surface(empty_surface((0.0, 10.0)));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(4.0, CursorSlot::First);
    let redraws = engine.surface(id).expect("surface").redraw_requests();

    assert!(!engine.set_mode(CursorMode::Single));
    assert_eq!(engine.cursor_key(CursorSlot::First), 4.0);
    assert_eq!(engine.surface(id).expect("surface").redraw_requests(), redraws);
}

#[test]
fn reentering_from_off_recomputes_position() {
    let mut engine = engine();
    let id = engine.register_surface(empty_surface((0.0, 10.0)));
    engine.set_mode(CursorMode::Single);
    engine.update_cursor_key(7.0, CursorSlot::First);

    engine.set_mode(CursorMode::Off);
    assert_eq!(engine.cursor_key(CursorSlot::First), 7.0);
    assert_eq!(engine.surface(id).expect("surface").annotation_count(), 0);

    engine.set_mode(CursorMode::Single);
    assert!((engine.cursor_key(CursorSlot::First) - 0.5).abs() <= 1e-12);
}

#[test]
fn handle_counts_follow_mode() {
    let mut engine = engine();
    let id = engine.register_surface(two_series_surface());
    let count = |engine: &CursorEngine<SignalSurface>| {
        engine.surface(id).expect("surface").annotation_count()
    };

    assert_eq!(count(&engine), 0);
    engine.set_mode(CursorMode::Single);
    // line + key label + 2 x (tracer + value label)
    assert_eq!(count(&engine), 6);
    assert!(!engine.cursor(CursorSlot::Second).has_handles());

    engine.set_mode(CursorMode::Double);
    assert_eq!(count(&engine), 12);
    assert_eq!(engine.cursor(CursorSlot::Second).line_handles().len(), 1);

    engine.set_mode(CursorMode::Single);
    assert_eq!(count(&engine), 6);
    assert!(!engine.cursor(CursorSlot::Second).has_handles());

    engine.set_mode(CursorMode::Off);
    assert_eq!(count(&engine), 0);
    assert!(!engine.cursor(CursorSlot::First).has_handles());
}

#[test]
fn placement_without_surfaces_uses_unit_range() {
    let mut engine = engine();
    engine.set_mode(CursorMode::Double);
    assert!((engine.cursor_key(CursorSlot::First) - 0.1).abs() <= 1e-12);
    assert!((engine.cursor_key(CursorSlot::Second) - 0.9).abs() <= 1e-12);
}

#[test]
fn active_surface_drives_placement() {
    let mut engine = engine();
    engine.register_surface(empty_surface((0.0, 10.0)));
    let second = engine.register_surface(empty_surface((100.0, 200.0)));
    engine.set_active_surface(second).expect("known surface");

    engine.set_mode(CursorMode::Single);
    assert!((engine.cursor_key(CursorSlot::First) - 105.0).abs() <= 1e-9);
}

#[test]
fn entering_mode_reenables_pan_zoom_everywhere() {
    let mut engine = engine();
    let id = engine.register_surface(empty_surface((0.0, 10.0)));
    engine
        .surface_mut(id)
        .expect("surface")
        .set_pan_zoom_enabled(false);

    engine.set_mode(CursorMode::Single);
    assert!(engine.surface(id).expect("surface").pan_zoom_enabled());
}

#[test]
fn descending_key_range_is_refused_before_placement() {
    assert!(
        SignalSurface::new("pane", Viewport::new(1000, 400), (10.0, 0.0), (0.0, 100.0)).is_err()
    );

    let mut engine = engine();
    let id = engine.register_surface(empty_surface((0.0, 10.0)));
    assert!(
        engine
            .surface_mut(id)
            .expect("surface")
            .set_visible_range(10.0, 0.0)
            .is_err()
    );

    engine.set_mode(CursorMode::Double);
    for slot in CursorSlot::ALL {
        let key = engine.cursor_key(slot);
        assert!((0.0..=10.0).contains(&key), "cursor {slot:?} at {key}");
    }
}
