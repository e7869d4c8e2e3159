//! Editor Integration Tests
//!
//! Exercises the public editor API end to end:
//! - Element lifecycle (add, move, resize, rotate, delete)
//! - Selection and bulk operations
//! - Viewport clamping, fitting and visibility
//! - Undo/redo and history bounds
//! - Serialization round trips
//! - Keyboard routing

use canvas_engine::{
    CanvasEditor, CanvasElement, EditorAction, EditorConfig, ElementId, ElementKind, ElementSpec,
    KeyChord, KeyPress, Point, Rect, Size,
};

const EPS: f64 = 1e-9;

/// Add a 200x50 text element at the given position.
fn add_text(editor: &mut CanvasEditor, x: f64, y: f64) -> ElementId {
    editor
        .add_element(ElementSpec::text("Test").at(x, y).sized(200.0, 50.0))
        .expect("valid text spec")
}

fn position(editor: &CanvasEditor, id: ElementId) -> (f64, f64) {
    let element = editor.element(id).expect("element exists");
    (
        element.x.expect("positioned"),
        element.y.expect("positioned"),
    )
}

// ============================================================================
// Element Lifecycle
// ============================================================================

#[test]
fn test_add_element_matches_spec() {
    let mut editor = CanvasEditor::default();
    let id = editor
        .add_element(ElementSpec::text("Hello").at(100.0, 100.0).sized(200.0, 50.0))
        .expect("valid spec");

    let element = editor.element(id).expect("element exists");
    assert_eq!(element.id, id);
    assert_eq!(element.x, Some(100.0));
    assert_eq!(element.y, Some(100.0));
    assert_eq!(element.width, Some(200.0));
    assert_eq!(element.height, Some(50.0));
    assert!(element.rotation.abs() < EPS);
    assert!(matches!(&element.kind, ElementKind::Text { content, .. } if content == "Hello"));
}

#[test]
fn test_every_element_type_can_be_added() {
    let mut editor = CanvasEditor::default();
    let specs = [
        ElementSpec::text("t").at(0.0, 0.0).sized(10.0, 10.0),
        ElementSpec::image("https://example.com/a.png")
            .at(0.0, 0.0)
            .sized(10.0, 10.0),
        ElementSpec::drawing(vec![canvas_engine::StrokePath::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
        ])])
        .at(0.0, 0.0),
        ElementSpec::note_reference("note-1")
            .at(0.0, 0.0)
            .sized(10.0, 10.0),
        ElementSpec::connector(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
    ];
    for spec in specs {
        editor.add_element(spec).expect("valid spec");
    }
    assert_eq!(editor.element_count(), 5);
}

#[test]
fn test_element_spec_from_json() {
    let mut editor = CanvasEditor::default();
    let spec = ElementSpec::from_json(
        r##"{"type":"text","content":"Json","fontSize":24,"color":"#ff0000","x":5,"y":6,"width":70,"height":30}"##,
    )
    .expect("valid json spec");
    let id = editor.add_element(spec).expect("valid spec");
    assert!(matches!(
        editor.element(id).map(|e| &e.kind),
        Some(ElementKind::Text { font_size, .. }) if (*font_size - 24.0).abs() < EPS
    ));
}

#[test]
fn test_move_element() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor
        .move_element(id, Point::new(200.0, 300.0))
        .expect("element exists");
    assert_eq!(position(&editor, id), (200.0, 300.0));
}

#[test]
fn test_resize_element() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor
        .resize_element(id, Size::new(400.0, 100.0))
        .expect("element exists");
    let element = editor.element(id).expect("element exists");
    assert_eq!(element.width, Some(400.0));
    assert_eq!(element.height, Some(100.0));
}

#[test]
fn test_rotate_element() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor.rotate_element(id, 45.0).expect("element exists");
    let rotation = editor.element(id).map(|e| e.rotation).expect("element exists");
    assert!((rotation - 45.0).abs() < EPS);
}

#[test]
fn test_mutation_bumps_updated_at_only() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    let created = editor.element(id).map(|e| e.created_at).expect("exists");
    editor
        .move_element(id, Point::new(1.0, 1.0))
        .expect("element exists");
    let element = editor.element(id).expect("exists");
    assert_eq!(element.created_at, created);
    assert!(element.updated_at >= created);
}

#[test]
fn test_delete_then_undo_restores_same_element() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 100.0, 100.0);
    editor.rotate_element(id, 30.0).expect("element exists");
    let before: CanvasElement = editor.element(id).cloned().expect("exists");

    editor.delete_element(id).expect("element exists");
    assert!(editor.element(id).is_none());

    assert!(editor.undo());
    assert_eq!(editor.element(id), Some(&before));
}

#[test]
fn test_z_order_operations() {
    let mut editor = CanvasEditor::default();
    let a = add_text(&mut editor, 0.0, 0.0);
    let b = add_text(&mut editor, 0.0, 0.0);
    let c = add_text(&mut editor, 0.0, 0.0);

    editor.send_to_back(c).expect("exists");
    let order: Vec<ElementId> = editor.elements().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![c, a, b]);
    assert_eq!(editor.element(c).map(|e| e.z_index), Some(0));

    editor.bring_to_front(a).expect("exists");
    let order: Vec<ElementId> = editor.elements().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![c, b, a]);
}

#[test]
fn test_snapshot_is_a_copy() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    let mut snapshot = editor.elements();
    snapshot[0].x = Some(9_999.0);
    assert_eq!(position(&editor, id), (0.0, 0.0));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_select_in_rect() {
    let mut editor = CanvasEditor::default();
    let a = add_text(&mut editor, 0.0, 0.0);
    let b = add_text(&mut editor, 150.0, 30.0);
    let _far = add_text(&mut editor, 5_000.0, 5_000.0);

    let count = editor
        .select_in_rect(Rect::new(-10.0, -10.0, 200.0, 100.0))
        .expect("finite rect");
    assert_eq!(count, 2);
    assert_eq!(editor.selected_ids(), vec![a, b]);
}

#[test]
fn test_move_selected_is_one_history_entry() {
    let mut editor = CanvasEditor::default();
    let ids: Vec<ElementId> = (0..5)
        .map(|i| add_text(&mut editor, f64::from(i) * 300.0, 0.0))
        .collect();
    editor.select_all();
    let entries = editor.history().undo_len();

    let moved = editor.move_selected(50.0, -25.0).expect("finite delta");
    assert_eq!(moved, 5);
    assert_eq!(editor.history().undo_len(), entries + 1);
    for (i, id) in ids.iter().enumerate() {
        let expected_x = f64::from(u32::try_from(i).expect("small")) * 300.0 + 50.0;
        assert_eq!(position(&editor, *id), (expected_x, -25.0));
    }

    assert!(editor.undo());
    for (i, id) in ids.iter().enumerate() {
        let expected_x = f64::from(u32::try_from(i).expect("small")) * 300.0;
        assert_eq!(position(&editor, *id), (expected_x, 0.0));
    }
}

#[test]
fn test_selection_never_holds_deleted_ids() {
    let mut editor = CanvasEditor::default();
    let a = add_text(&mut editor, 0.0, 0.0);
    let b = add_text(&mut editor, 0.0, 0.0);
    editor.select_element(a, false).expect("exists");
    editor.select_element(b, true).expect("exists");

    editor.delete_element(a).expect("exists");
    assert_eq!(editor.selected_ids(), vec![b]);
    assert_eq!(editor.selected_elements().len(), 1);
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_zoom_is_clamped() {
    let mut editor = CanvasEditor::default();
    assert!((editor.set_zoom(10.0) - 5.0).abs() < EPS);
    assert!((editor.viewport().zoom() - 5.0).abs() < EPS);
    assert!((editor.set_zoom(0.01) - 0.1).abs() < EPS);
    assert!((editor.viewport().zoom() - 0.1).abs() < EPS);
}

#[test]
fn test_pan_viewport_adds_delta() {
    let mut editor = CanvasEditor::default();
    editor.pan_viewport(100.0, 50.0);
    editor.pan_viewport(-20.0, 10.0);
    assert!((editor.viewport().x() - 80.0).abs() < EPS);
    assert!((editor.viewport().y() - 60.0).abs() < EPS);
}

#[test]
fn test_center_on_point() {
    let mut editor = CanvasEditor::default();
    editor.center_on(Point::new(500.0, 500.0));
    let center = editor.visible_rect().center();
    assert!((center.x - 500.0).abs() < EPS);
    assert!((center.y - 500.0).abs() < EPS);
}

#[test]
fn test_fit_to_view_contains_all_content() {
    let mut editor = CanvasEditor::new(EditorConfig::default().with_container_size(800.0, 600.0));
    add_text(&mut editor, 0.0, 0.0);
    add_text(&mut editor, 3_000.0, 2_000.0);

    editor.fit_to_view();
    assert!(editor.viewport().zoom() <= 1.0);

    let visible = editor.visible_rect();
    let content = editor.store().bounds().expect("non-empty");
    assert!(visible.x <= content.x && visible.max_x() >= content.max_x());
    assert!(visible.y <= content.y && visible.max_y() >= content.max_y());
    assert_eq!(editor.visible_elements().len(), 2);
}

#[test]
fn test_visible_elements_excludes_far_away() {
    let mut editor = CanvasEditor::default();
    let near = add_text(&mut editor, 100.0, 100.0);
    let _far = add_text(&mut editor, 10_000.0, 100.0);

    let visible: Vec<ElementId> = editor.visible_elements().iter().map(|e| e.id).collect();
    assert_eq!(visible, vec![near]);
}

#[test]
fn test_visible_elements_includes_partial_overlap() {
    let mut editor = CanvasEditor::default();
    // Straddles the right edge of the 800px-wide view.
    let id = add_text(&mut editor, 750.0, 100.0);
    let visible: Vec<ElementId> = editor.visible_elements().iter().map(|e| e.id).collect();
    assert_eq!(visible, vec![id]);
}

#[test]
fn test_visibility_follows_pan_and_zoom() {
    let mut editor = CanvasEditor::default();
    let far = add_text(&mut editor, 10_000.0, 100.0);
    assert!(editor.visible_elements().is_empty());

    editor.pan_viewport(9_900.0, 0.0);
    assert_eq!(editor.visible_elements().len(), 1);

    editor.pan_viewport(-9_900.0, 0.0);
    editor.set_zoom(0.1);
    // 800 / 0.1 = 8000 document units wide, still short of x = 10000.
    assert!(editor.visible_elements().is_empty());
    editor.center_on(Point::new(10_000.0, 100.0));
    assert_eq!(editor.visible_elements().first().map(|e| e.id), Some(far));
}

#[test]
fn test_extreme_but_finite_geometry_is_indexed() {
    let mut editor = CanvasEditor::default();
    let wide = editor
        .add_element(ElementSpec::image("a.png").at(-1.0e22, 0.0).sized(1.0e22, 10.0))
        .expect("finite geometry is valid");
    let near = add_text(&mut editor, 100.0, 100.0);

    let visible: Vec<ElementId> = editor.visible_elements().iter().map(|e| e.id).collect();
    assert_eq!(visible, vec![wide, near]);

    editor.move_element(wide, Point::new(-3.0e22, 0.0)).expect("exists");
    let visible: Vec<ElementId> = editor.visible_elements().iter().map(|e| e.id).collect();
    assert_eq!(visible, vec![near]);

    editor.delete_element(wide).expect("exists");
    assert!(editor.undo());
    assert!(editor.element(wide).is_some());
}

#[test]
fn test_viewport_changes_are_not_history() {
    let mut editor = CanvasEditor::default();
    editor.pan_viewport(10.0, 10.0);
    editor.set_zoom(2.0);
    editor.fit_to_view();
    assert!(!editor.can_undo());
    assert!(!editor.is_dirty());
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_initial_history_state() {
    let editor = CanvasEditor::default();
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
}

#[test]
fn test_undo_reverses_only_the_last_call() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor
        .move_element(id, Point::new(10.0, 10.0))
        .expect("exists");
    editor
        .resize_element(id, Size::new(300.0, 80.0))
        .expect("exists");
    editor.rotate_element(id, 90.0).expect("exists");

    assert!(editor.undo());
    let element = editor.element(id).expect("exists");
    assert!(element.rotation.abs() < EPS);
    assert_eq!(element.width, Some(300.0));
    assert_eq!(position(&editor, id), (10.0, 10.0));

    assert!(editor.undo());
    assert_eq!(editor.element(id).and_then(|e| e.width), Some(200.0));
    assert_eq!(position(&editor, id), (10.0, 10.0));
}

#[test]
fn test_redo_after_undo() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor
        .move_element(id, Point::new(50.0, 50.0))
        .expect("exists");

    assert!(editor.undo());
    assert!(editor.can_redo());
    assert!(editor.redo());
    assert_eq!(position(&editor, id), (50.0, 50.0));
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

#[test]
fn test_new_command_clears_redo() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor
        .move_element(id, Point::new(50.0, 50.0))
        .expect("exists");
    editor.undo();
    assert!(editor.can_redo());

    editor.rotate_element(id, 10.0).expect("exists");
    assert!(!editor.can_redo());
}

#[test]
fn test_failed_mutation_is_not_recorded() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    let entries = editor.history().undo_len();
    assert!(editor.resize_element(id, Size::new(0.0, 10.0)).is_err());
    assert!(editor.move_element(id, Point::new(f64::INFINITY, 0.0)).is_err());
    assert_eq!(editor.history().undo_len(), entries);
}

#[test]
fn test_history_is_bounded() {
    let max = 10;
    let extra = 5;
    let mut editor = CanvasEditor::new(EditorConfig::default().with_max_history_size(max));
    let id = add_text(&mut editor, 0.0, 0.0);
    for i in 0..(max + extra) {
        let x = f64::from(u32::try_from(i).expect("small"));
        editor.move_element(id, Point::new(x, 0.0)).expect("exists");
    }
    assert_eq!(editor.history().undo_len(), max);

    let mut undone = 0;
    while editor.can_undo() {
        assert!(editor.undo());
        undone += 1;
    }
    assert_eq!(undone, max);
    // Eviction forecloses undo depth but never corrupts the store.
    assert!(editor.element(id).is_some());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_serialize_round_trip_into_fresh_editor() {
    let mut editor = CanvasEditor::default();
    add_text(&mut editor, 100.0, 100.0);
    editor
        .add_element(ElementSpec::connector(Point::new(0.0, 0.0), Point::new(300.0, 200.0)))
        .expect("valid spec");
    editor.pan_viewport(25.0, -40.0);
    editor.set_zoom(1.5);

    let json = editor.serialize().expect("serialize");
    let mut restored = CanvasEditor::default();
    restored.deserialize(&json).expect("valid snapshot");

    assert_eq!(restored.elements(), editor.elements());
    assert_eq!(restored.viewport().state(), editor.viewport().state());
    assert_eq!(restored.document_id(), editor.document_id());
    assert_eq!(restored.serialize().expect("serialize"), json);
}

/// Coordinates that need all 17 significant digits must come back as the
/// same `f64` values.
#[test]
fn test_serialize_round_trip_preserves_fractional_coordinates() {
    let mut editor = CanvasEditor::default();
    for n in 0..2_000_u32 {
        let n = f64::from(n);
        editor
            .add_element(
                ElementSpec::text("frac")
                    .at(n / 7.0 + 0.1 * 3.0, n / 3.0 - 0.7)
                    .sized(10.0 + n / 9.0, 0.1 * 3.0 + n),
            )
            .expect("valid spec");
    }
    editor.pan_viewport(1.0 / 3.0, -2.0 / 7.0);
    editor.set_zoom(0.1 * 7.0);

    let json = editor.serialize().expect("serialize");
    let mut restored = CanvasEditor::default();
    restored.deserialize(&json).expect("valid snapshot");

    let mismatches = editor
        .elements()
        .iter()
        .zip(restored.elements().iter())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(mismatches, 0);
    assert_eq!(restored.element_count(), 2_000);
    assert_eq!(restored.viewport().state(), editor.viewport().state());
    assert_eq!(restored.serialize().expect("serialize"), json);
}

#[test]
fn test_deserialize_failure_leaves_state_untouched() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor.select_all();
    let before = editor.serialize().expect("serialize");

    let mut corrupt: serde_json::Value = serde_json::from_str(&before).expect("json");
    corrupt["elements"][0]["width"] = serde_json::json!(-10.0);
    let err = editor
        .deserialize(&corrupt.to_string())
        .expect_err("invalid element");
    assert!(err.is_validation());

    assert!(editor.deserialize("not json at all").is_err());
    assert!(editor.deserialize(r#"{"elements":[]}"#).is_err());

    assert_eq!(editor.serialize().expect("serialize"), before);
    assert_eq!(editor.selected_ids(), vec![id]);
    assert!(editor.can_undo());
}

#[test]
fn test_deserialize_resets_history_and_selection() {
    let mut editor = CanvasEditor::default();
    add_text(&mut editor, 0.0, 0.0);
    let json = editor.serialize().expect("serialize");

    editor.select_all();
    editor.deserialize(&json).expect("valid snapshot");
    assert!(!editor.can_undo());
    assert!(editor.selected_ids().is_empty());
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn test_delete_key_removes_selection_in_one_undo() {
    let mut editor = CanvasEditor::default();
    let ids: Vec<ElementId> = (0..3)
        .map(|i| add_text(&mut editor, f64::from(i) * 10.0, 0.0))
        .collect();
    editor.select_all();

    let action = editor
        .handle_key_press(&KeyPress::new("Delete"))
        .expect("handled");
    assert_eq!(action, Some(EditorAction::DeleteSelection));
    assert_eq!(editor.element_count(), 0);

    assert!(editor.undo());
    for id in &ids {
        assert!(editor.element(*id).is_some());
    }
}

#[test]
fn test_undo_redo_keys() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);

    editor
        .handle_key_press(&KeyPress::new("z").ctrl())
        .expect("handled");
    assert!(editor.element(id).is_none());

    editor
        .handle_key_press(&KeyPress::new("Z").ctrl().shift())
        .expect("handled");
    assert!(editor.element(id).is_some());

    editor
        .handle_key_press(&KeyPress::new("z").meta())
        .expect("handled");
    editor
        .handle_key_press(&KeyPress::new("y").ctrl())
        .expect("handled");
    assert!(editor.element(id).is_some());
}

#[test]
fn test_select_all_key() {
    let mut editor = CanvasEditor::default();
    add_text(&mut editor, 0.0, 0.0);
    add_text(&mut editor, 500.0, 0.0);
    editor
        .handle_key_press(&KeyPress::new("a").ctrl())
        .expect("handled");
    assert_eq!(editor.selected_ids().len(), 2);

    editor
        .handle_key_press(&KeyPress::new("Escape"))
        .expect("handled");
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn test_arrow_keys_nudge_selection() {
    let mut editor = CanvasEditor::new(EditorConfig::default().with_nudge_steps(1.0, 10.0));
    let id = add_text(&mut editor, 0.0, 0.0);
    editor.select_element(id, false).expect("exists");

    editor
        .handle_key_press(&KeyPress::new("ArrowRight"))
        .expect("handled");
    editor
        .handle_key_press(&KeyPress::new("ArrowDown").shift())
        .expect("handled");
    assert_eq!(position(&editor, id), (1.0, 10.0));

    editor.undo();
    assert_eq!(position(&editor, id), (1.0, 0.0));
}

#[test]
fn test_unbound_key_does_nothing() {
    let mut editor = CanvasEditor::default();
    add_text(&mut editor, 0.0, 0.0);
    let entries = editor.history().undo_len();
    let action = editor
        .handle_key_press(&KeyPress::new("q"))
        .expect("handled");
    assert_eq!(action, None);
    assert_eq!(editor.history().undo_len(), entries);
}

#[test]
fn test_custom_binding() {
    let mut editor = CanvasEditor::default();
    let id = add_text(&mut editor, 0.0, 0.0);
    editor.select_all();
    editor.bind_key(KeyChord::new("x"), EditorAction::DeleteSelection);
    editor
        .handle_key_press(&KeyPress::new("X"))
        .expect("handled");
    assert!(editor.element(id).is_none());
}

// ============================================================================
// Rendering and Scale
// ============================================================================

struct RecordingPainter {
    painted: Vec<(ElementId, Rect)>,
}

impl canvas_engine::ElementPainter for RecordingPainter {
    fn paint(&mut self, element: &CanvasElement, screen_rect: Rect) {
        self.painted.push((element.id, screen_rect));
    }
}

#[test]
fn test_render_paints_visible_in_paint_order() {
    let mut editor = CanvasEditor::default();
    let bottom = add_text(&mut editor, 0.0, 0.0);
    let top = add_text(&mut editor, 50.0, 50.0);
    let _offscreen = add_text(&mut editor, 20_000.0, 0.0);
    editor.set_zoom(2.0);

    let mut painter = RecordingPainter { painted: Vec::new() };
    let count = editor.render(&mut painter);
    assert_eq!(count, 2);
    let ids: Vec<ElementId> = painter.painted.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![bottom, top]);
    assert_eq!(painter.painted[1].1, Rect::new(100.0, 100.0, 400.0, 100.0));
    assert!(!editor.can_redo());
}

#[test]
fn test_many_elements_visibility_is_local() {
    let mut editor = CanvasEditor::default();
    for row in 0..50 {
        for col in 0..50 {
            add_text(
                &mut editor,
                f64::from(col) * 1_000.0,
                f64::from(row) * 1_000.0,
            );
        }
    }
    assert_eq!(editor.element_count(), 2_500);

    // The default 800x600 view at the origin only covers the first element.
    assert_eq!(editor.visible_elements().len(), 1);

    editor.set_zoom(0.125);
    // 6400 x 4800 document units: columns 0..=6, rows 0..=4.
    assert_eq!(editor.visible_elements().len(), 35);
}
