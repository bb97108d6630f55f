//! Paint passes: placement, clipping, paint order and the render scheduler.

mod common;

use std::thread;
use std::time::Duration;

use common::{engine, engine_with, quiet_config};
use tml_core::{
    Axis, BorderType, Engine, EngineConfig, Node, Position, PositionType, Style, Volume,
};

fn frame(engine: &Engine) -> String {
    String::from_utf8(engine.render_now().unwrap()).unwrap()
}

fn boxed(engine: &Engine, name: &str, width: i32, height: i32) -> Node {
    let node = engine.create_node(name);
    node.set_volume(Volume::new(width, height)).unwrap();
    node
}

// =============================================================================
// FRAME
// =============================================================================

#[test]
fn test_nothing_painted_before_first_size() {
    let engine = engine();
    let node = boxed(&engine, "node", 5, 1);
    engine.body().insert([&node]).unwrap();

    assert!(engine.render_now().unwrap().is_empty());
    assert_eq!(engine.frames_painted(), 0);
    assert_eq!(engine.render_requests(), 0);
}

#[test]
fn test_body_fills_the_screen() {
    let engine = engine();
    engine.resize(4, 2);

    assert_eq!(
        frame(&engine),
        "\x1b[?25l\x1b[37m\x1b[1;1H    \x1b[2;1H    \x1b[0m"
    );
    assert_eq!(engine.frames_painted(), 1);
}

#[test]
fn test_border_and_text() {
    let engine = engine();
    engine.resize(20, 10);
    let node = boxed(&engine, "node", 4, 3);
    node.set_position(Position::new(1, 1)).unwrap();
    node.set_style(Style { border: BorderType::Solid, ..Style::default() }).unwrap();
    node.set_text("abcdef").unwrap();
    engine.body().insert([&node]).unwrap();

    let out = frame(&engine);
    assert!(out.contains(
        "\x1b[?25l\x1b[37m\x1b[40m\x1b[2;2H----\x1b[3;2H|ab|\x1b[4;2H----\x1b[0m"
    ));
    assert_eq!(node.absolute_origin().unwrap(), (1, 1));
}

#[test]
fn test_hidden_text_draws_blanks() {
    let engine = engine();
    engine.resize(20, 10);
    let node = boxed(&engine, "node", 3, 1);
    node.set_style(Style { show_text: false, ..Style::default() }).unwrap();
    node.set_text("abc").unwrap();
    engine.body().insert([&node]).unwrap();

    assert!(frame(&engine).contains("\x1b[40m\x1b[1;1H   \x1b[0m"));
}

// =============================================================================
// PLACEMENT
// =============================================================================

fn centered_start(parent_width: i32) -> String {
    let engine = engine();
    engine.resize(80, 24);
    let parent = boxed(&engine, "parent", parent_width, 5);
    let child = boxed(&engine, "child", 10, 1);
    child
        .set_position(Position::new(0, 0).with_kind(PositionType::centered(Axis::X)))
        .unwrap();
    child.set_text("0123456789").unwrap();
    engine.body().insert([&parent]).unwrap();
    parent.insert([&child]).unwrap();
    frame(&engine)
}

#[test]
fn test_centering_uses_floor_halves() {
    assert!(centered_start(40).contains("\x1b[1;16H0123456789"));
    assert!(centered_start(41).contains("\x1b[1;16H0123456789"));
}

#[test]
fn test_right_anchoring() {
    let engine = engine();
    engine.resize(80, 24);
    let node = boxed(&engine, "node", 10, 1);
    node.set_position(Position::new(2, 0).with_kind(PositionType::right_anchored(Axis::X)))
        .unwrap();
    node.set_text("right").unwrap();
    engine.body().insert([&node]).unwrap();

    assert!(frame(&engine).contains("\x1b[1;69Hright"));
}

#[test]
fn test_child_offset_by_parent_origin() {
    let engine = engine();
    engine.resize(80, 24);
    let parent = boxed(&engine, "parent", 20, 5);
    parent.set_position(Position::new(10, 3)).unwrap();
    let child = boxed(&engine, "child", 3, 1);
    child.set_position(Position::new(2, 1)).unwrap();
    child.set_text("kid").unwrap();
    engine.body().insert([&parent]).unwrap();
    parent.insert([&child]).unwrap();

    assert!(frame(&engine).contains("\x1b[5;13Hkid"));
    assert_eq!(child.absolute_origin().unwrap(), (12, 4));
}

#[test]
fn test_adaptive_child_fills_parent() {
    let engine = engine();
    engine.resize(80, 24);
    let parent = boxed(&engine, "parent", 6, 2);
    parent.set_position(Position::new(5, 5)).unwrap();
    let child = engine.create_node("child");
    child.set_volume(Volume::AUTO).unwrap();
    child.set_style(Style { auto_size: true, ..Style::default() }).unwrap();
    child.set_text("abcdefghijkl").unwrap();
    engine.body().insert([&parent]).unwrap();
    parent.insert([&child]).unwrap();

    assert!(frame(&engine).contains("\x1b[6;6Habcdef\x1b[7;6Hghijkl\x1b[0m"));
    assert_eq!(child.volume().unwrap(), Volume::AUTO);
}

// =============================================================================
// CLIPPING
// =============================================================================

#[test]
fn test_negative_start_is_clipped() {
    let engine = engine();
    engine.resize(80, 24);
    let node = boxed(&engine, "node", 10, 1);
    node.set_position(Position::new(-3, 0)).unwrap();
    node.set_text("ABCDEFGHIJ").unwrap();
    engine.body().insert([&node]).unwrap();

    assert!(frame(&engine).contains("\x1b[40m\x1b[1;1HABCDEFG\x1b[0m"));
}

#[test]
fn test_overflow_is_clipped_to_parent() {
    let engine = engine();
    engine.resize(80, 24);
    let parent = boxed(&engine, "parent", 5, 3);
    let child = boxed(&engine, "child", 8, 1);
    child.set_position(Position::new(2, 0)).unwrap();
    child.set_text("12345678").unwrap();
    engine.body().insert([&parent]).unwrap();
    parent.insert([&child]).unwrap();

    assert!(frame(&engine).contains("\x1b[1;3H123\x1b[0m"));
}

#[test]
fn test_extreme_geometry_is_clipped_not_overflowed() {
    let engine = engine();
    engine.resize(80, 24);
    let wide = boxed(&engine, "wide", i32::MAX, 1);
    wide.set_position(Position::new(5, 0)).unwrap();
    wide.set_text("wide").unwrap();
    let far = boxed(&engine, "far", 10, 1);
    far.set_position(Position::new(i32::MAX - 2, i32::MAX - 2)).unwrap();
    far.set_text("far").unwrap();
    let anchored = boxed(&engine, "anchored", i32::MAX, 1);
    anchored
        .set_position(Position::new(-5, 2).with_kind(PositionType::right_anchored(Axis::X)))
        .unwrap();
    anchored.set_text("anchor").unwrap();
    engine.body().insert([&wide, &far, &anchored]).unwrap();

    let out = frame(&engine);
    let row = format!("\x1b[1;6Hwide{}\x1b[0m", " ".repeat(71));
    assert!(out.contains(&row));
    assert!(out.contains("\x1b[3;1Hanchor"));
    assert!(!out.contains("far"));
}

#[test]
fn test_child_outside_parent_is_skipped_with_subtree() {
    let engine = engine();
    engine.resize(80, 24);
    let parent = boxed(&engine, "parent", 5, 3);
    let outside = boxed(&engine, "outside", 2, 1);
    outside.set_position(Position::new(6, 0)).unwrap();
    outside.set_text("no").unwrap();
    let grandchild = boxed(&engine, "grandchild", 1, 1);
    grandchild.set_text("g").unwrap();
    engine.body().insert([&parent]).unwrap();
    parent.insert([&outside]).unwrap();
    outside.insert([&grandchild]).unwrap();

    let out = frame(&engine);
    assert!(!out.contains("no"));
    assert!(!out.contains('g'));
}

// =============================================================================
// RENDERABILITY
// =============================================================================

#[test]
fn test_hidden_and_unsized_nodes_are_skipped() {
    let engine = engine();
    engine.resize(80, 24);
    let hidden = boxed(&engine, "hidden", 4, 1);
    hidden.set_style(Style { display: false, ..Style::default() }).unwrap();
    hidden.set_text("HIDE").unwrap();
    let flat = boxed(&engine, "flat", 4, 0);
    flat.set_text("FLAT").unwrap();
    let auto = engine.create_node("auto");
    auto.set_volume(Volume::AUTO).unwrap();
    auto.set_text("AUTO").unwrap();
    let under = boxed(&engine, "under", 4, 1);
    under.set_text("UNDR").unwrap();
    engine.body().insert([&hidden, &flat, &auto]).unwrap();
    hidden.insert([&under]).unwrap();

    let out = frame(&engine);
    for text in ["HIDE", "FLAT", "AUTO", "UNDR"] {
        assert!(!out.contains(text), "{text} should not be painted");
    }
}

#[test]
fn test_lower_z_index_paints_first() {
    let engine = engine();
    engine.resize(80, 24);
    let high = boxed(&engine, "high", 4, 1);
    high.set_position(Position::new(0, 0).with_z_index(5)).unwrap();
    high.set_text("HIGH").unwrap();
    let low = boxed(&engine, "low", 4, 1);
    low.set_position(Position::new(0, 0).with_z_index(2)).unwrap();
    low.set_text("LOW!").unwrap();
    engine.body().insert([&high, &low]).unwrap();

    let out = frame(&engine);
    let low_at = out.find("LOW!").unwrap();
    let high_at = out.find("HIGH").unwrap();
    assert!(low_at < high_at);
}

// =============================================================================
// SCHEDULER
// =============================================================================

#[test]
fn test_burst_collapses_into_one_paint() {
    let config = EngineConfig::default().with_render_debounce(Duration::from_millis(50));
    let (engine, capture) = engine_with(config);
    let node = boxed(&engine, "node", 10, 1);
    engine.body().insert([&node]).unwrap();

    engine.resize(80, 24);
    for i in 0..20 {
        node.set_text(format!("tick {i}")).unwrap();
    }
    thread::sleep(Duration::from_millis(300));

    assert_eq!(engine.frames_painted(), 1);
    assert!(capture.text().contains("tick 19"));
}

#[test]
fn test_manual_render_is_scheduled() {
    let config = EngineConfig::default().with_render_debounce(Duration::from_millis(5));
    let (engine, capture) = engine_with(config);
    engine.resize(10, 2);
    assert!(common::wait_until(Duration::from_secs(2), || engine.frames_painted() == 1));

    engine.render();
    assert!(common::wait_until(Duration::from_secs(2), || engine.frames_painted() == 2));
    assert!(!capture.is_empty());
}

#[test]
fn test_quiet_engine_never_paints_on_its_own() {
    let (engine, capture) = engine_with(quiet_config());
    engine.resize(10, 2);
    thread::sleep(Duration::from_millis(50));

    assert_eq!(engine.frames_painted(), 0);
    assert!(capture.is_empty());
}
