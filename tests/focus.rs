//! Focus selection, keystroke dispatch and rollback.

mod common;

use std::sync::{Arc, Mutex};

use common::{engine, entries, log, record};
use tml_core::{Engine, EventKind, KeyboardEvent, Modifiers, Node};

/// body → parent → child, parent listening for keystrokes.
fn chain(engine: &Engine) -> (Node, Node) {
    let parent = engine.create_node("parent");
    let child = engine.create_node("child");
    engine.body().insert([&parent]).unwrap();
    parent.insert([&child]).unwrap();
    parent
        .add_event_listener(EventKind::KeyPressed, |_, _| {})
        .unwrap();
    (parent, child)
}

#[test]
fn test_select_reports_previous_focus() {
    let engine = engine();
    let a = engine.create_node("a");
    let b = engine.create_node("b");
    let events = log();
    record(&events, &a, &[EventKind::Selected]);
    record(&events, &b, &[EventKind::Selected]);

    engine.select(&a);
    engine.select(&b);

    let body = engine.body().key();
    assert_eq!(
        entries(&events),
        vec![
            (EventKind::Selected, a.key(), body),
            (EventKind::Selected, b.key(), a.key()),
        ]
    );
    assert_eq!(engine.focused(), Some(b));
}

#[test]
fn test_handled_keystroke_keeps_focus() {
    let engine = engine();
    let node = engine.create_node("input");
    engine.body().insert([&node]).unwrap();

    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    node.add_event_listener(EventKind::KeyPressed, move |target, _| {
        *sink.lock().unwrap() = target.keyboard_event().unwrap();
    })
    .unwrap();
    engine.select(&node);

    let key = KeyboardEvent::char('x').with_modifiers(Modifiers::ctrl());
    engine.dispatch_key(key.clone());

    assert_eq!(engine.focused(), Some(node.clone()));
    assert_eq!(*seen.lock().unwrap(), Some(key.clone()));
    assert_eq!(node.keyboard_event().unwrap(), Some(key));
}

#[test]
fn test_unhandled_keystroke_rolls_back_to_parent() {
    let engine = engine();
    let (parent, child) = chain(&engine);
    engine.select(&child);

    let events = log();
    record(&events, &parent, &[EventKind::Selected]);

    engine.dispatch_key(KeyboardEvent::new("Enter"));

    assert_eq!(engine.focused(), Some(parent.clone()));
    assert_eq!(
        entries(&events),
        vec![(EventKind::Selected, parent.key(), child.key())]
    );
    // The keystroke itself was stored on the node that could not handle it.
    assert_eq!(
        child.keyboard_event().unwrap(),
        Some(KeyboardEvent::new("Enter"))
    );
}

#[test]
fn test_removed_focus_rolls_back_to_parent() {
    let engine = engine();
    let (parent, child) = chain(&engine);
    engine.select(&child);
    child.remove().unwrap();

    let events = log();
    record(&events, &parent, &[EventKind::Selected]);
    engine.dispatch_key(KeyboardEvent::char('a'));

    assert_eq!(engine.focused(), Some(parent.clone()));
    assert_eq!(
        entries(&events),
        vec![(EventKind::Selected, parent.key(), child.key())]
    );
}

#[test]
fn test_rollback_climbs_past_removed_ancestors() {
    let engine = engine();
    let (parent, child) = chain(&engine);
    engine.select(&child);
    parent.remove().unwrap();

    let body = engine.body();
    let events = log();
    record(&events, &body, &[EventKind::Selected]);
    engine.dispatch_key(KeyboardEvent::char('a'));

    assert_eq!(engine.focused(), Some(body.clone()));
    assert_eq!(
        entries(&events),
        vec![(EventKind::Selected, body.key(), parent.key())]
    );
}

#[test]
fn test_detached_focus_falls_back_to_root_silently() {
    let engine = engine();
    let loose = engine.create_node("loose");
    engine.select(&loose);

    let body = engine.body();
    let events = log();
    record(&events, &body, &[EventKind::Selected]);
    engine.dispatch_key(KeyboardEvent::char('a'));

    assert_eq!(engine.focused(), Some(body));
    assert!(entries(&events).is_empty());
}

#[test]
fn test_root_without_listener_stays_focused() {
    let engine = engine();
    let body = engine.body();
    let events = log();
    record(&events, &body, &[EventKind::Selected]);

    engine.dispatch_key(KeyboardEvent::new("Escape"));

    assert_eq!(engine.focused(), Some(body.clone()));
    assert!(entries(&events).is_empty());
    assert_eq!(
        body.keyboard_event().unwrap(),
        Some(KeyboardEvent::new("Escape"))
    );
}
