//! Three-page demo built on the public node API.
//!
//! Left/Right moves the highlight between the buttons, Enter opens the page
//! behind the highlighted one. `q` on the main screen quits.
//!
//! Run with: cargo run --example pages
//! Logs go to `pages.log` (filter with RUST_LOG).

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tml_core::{
    ansi, Axis, BorderType, Color, Dimension, Engine, EngineConfig, EventKind, Node, Position,
    PositionType, Result, Style, Volume,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    if let Ok(file) = File::create("pages.log") {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let engine = Engine::new(EngineConfig::default())?;
    engine.start()?;

    let body = engine.body();
    restyle(&body, |style| style.background = Some(Color::Yellow))?;

    let buttons = vec![
        button(
            &engine,
            move_box_page(&engine)?,
            "MoveBox",
            Position::new(10, 0).with_kind(PositionType::centered(Axis::Y)),
        )?,
        button(
            &engine,
            reader_page(&engine)?,
            "Electronic Reader",
            Position::new(35, 0).with_kind(PositionType::centered(Axis::XY)),
        )?,
        button(
            &engine,
            text_page(&engine)?,
            "Awaiting development",
            Position::new(10, 0).with_kind(PositionType {
                center: Axis::Y,
                right: Axis::X,
            }),
        )?,
    ];

    let highlighted = Arc::new(Mutex::new(None::<usize>));
    let menu = buttons.clone();
    body.add_event_listener(EventKind::KeyPressed, move |node, _| {
        let Ok(Some(key)) = node.keyboard_event() else {
            return;
        };
        let mut index = highlighted.lock().unwrap_or_else(|e| e.into_inner());
        match key.key.as_str() {
            "ArrowLeft" => *index = index.map(|i| i.saturating_sub(1)).or(Some(0)),
            "ArrowRight" => *index = Some(index.map_or(0, |i| (i + 1).min(menu.len() - 1))),
            "Enter" => {
                if let Some(target) = index.and_then(|i| menu.get(i)) {
                    node.engine().select(target);
                }
            }
            _ if key.is_char('q') => quit(),
            _ => {}
        }
        for (i, button) in menu.iter().enumerate() {
            let lit = *index == Some(i);
            let _ = restyle(button, |style| {
                style.background = Some(if lit { Color::Purple } else { Color::Blue });
                style.border = if lit { BorderType::Solid } else { BorderType::None };
                style.border_color = lit.then_some(Color::White);
            });
        }
    })?;

    let mut children = vec![title(&engine, "<< demo: left or right moves the highlight >>")?];
    children.extend(buttons);
    body.insert(&children)?;

    loop {
        std::thread::park();
    }
}

fn quit() -> ! {
    let mut stdout = io::stdout();
    let _ = ansi::clear_screen(&mut stdout);
    let _ = ansi::cursor_show(&mut stdout);
    let _ = stdout.flush();
    let _ = crossterm::terminal::disable_raw_mode();
    std::process::exit(0)
}

fn restyle(node: &Node, edit: impl FnOnce(&mut Style)) -> Result<()> {
    let mut style = node.style()?;
    edit(&mut style);
    node.set_style(style)
}

fn show(node: &Node, display: bool) {
    let _ = restyle(node, |style| style.display = display);
}

fn title(engine: &Engine, text: &str) -> Result<Node> {
    let node = engine.create_node("title");
    node.set_text(text)?;
    node.set_volume(Volume::new(text.len() as i32, 1))?;
    node.set_position(Position::new(0, 1).with_kind(PositionType::centered(Axis::X)))?;
    Ok(node)
}

/// A button that opens `page` when selected and closes it when the page hands
/// focus back.
fn button(engine: &Engine, page: Node, text: &str, position: Position) -> Result<Node> {
    let node = engine.create_node("button");
    node.set_text(text)?;
    restyle(&node, |style| style.background = Some(Color::Blue))?;
    node.set_volume(Volume::new(20, 5))?;
    node.set_position(position)?;

    engine.body().insert([&page])?;
    show(&page, false);

    node.add_event_listener(EventKind::Selected, move |node, origin| {
        let engine = node.engine();
        if *origin == page {
            show(&page, false);
            engine.select(&engine.body());
        } else {
            show(&page, true);
            engine.select(&page);
        }
    })?;
    node.add_event_listener(EventKind::KeyPressed, |_, _| {})?;
    Ok(node)
}

fn page(engine: &Engine, background: Color) -> Result<Node> {
    let node = engine.create_node("page");
    restyle(&node, |style| {
        style.auto_size = true;
        style.background = Some(background);
    })?;
    node.set_position(Position::new(0, 0).with_z_index(1))?;
    node.set_volume(Volume::AUTO)?;
    Ok(node)
}

// =============================================================================
// Pages
// =============================================================================

fn move_box_page(engine: &Engine) -> Result<Node> {
    let node = page(engine, Color::White)?;
    restyle(&node, |style| style.text_color = Some(Color::Black))?;

    let boxed = engine.create_node("box");
    restyle(&boxed, |style| {
        style.background = Some(Color::Black);
        style.border = BorderType::Dotted;
        style.border_color = Some(Color::Green);
    })?;
    boxed.set_volume(Volume::new(10, 5))?;
    boxed.set_text("Box")?;
    boxed.set_position(Position::new(1, 2))?;

    let target = boxed.clone();
    node.add_event_listener(EventKind::KeyPressed, move |node, _| {
        let Ok(Some(key)) = node.keyboard_event() else {
            return;
        };
        if key.key == "Escape" {
            let engine = node.engine();
            engine.select(&engine.body());
            show(node, false);
            return;
        }
        let Ok(mut position) = target.position() else {
            return;
        };
        let screen = node.engine().terminal_size();
        let label = match key.rune {
            Some('w') if position.y > 3 => {
                position.y -= 1;
                "GoTop"
            }
            Some('s') if position.y < screen.height - 15 => {
                position.y += 1;
                "GoBottom"
            }
            Some('a') if position.x > 1 => {
                position.x -= 1;
                "GoLeft"
            }
            Some('d') if position.x < screen.width - 15 => {
                position.x += 1;
                "GoRight"
            }
            _ => "stop",
        };
        let _ = target.set_text(label);
        let _ = target.set_position(position);
    })?;

    node.insert([
        &title(engine, "Move the box with w, a, s, d. Esc closes the page")?,
        &boxed,
    ])?;
    Ok(node)
}

const SITES: &str = r#"{
  "sites": [
    { "id": "1", "name": "runoob", "tips": "up or down moves the highlight" },
    { "id": "2", "name": "runoobTools", "url": "c.runoob.com" },
    { "id": "3", "name": "Google", "tips": "esc quits the reader" }
  ]
}"#;

fn reader_page(engine: &Engine) -> Result<Node> {
    let node = page(engine, Color::Red)?;

    let text = engine.create_node("text");
    restyle(&text, |style| {
        style.auto_size = true;
        style.background = Some(Color::Red);
    })?;
    text.set_volume(Volume::AUTO)?;
    text.set_position(Position::new(0, 3))?;

    let mut lines = Vec::new();
    for (row, line) in SITES.lines().enumerate() {
        let child = engine.create_node("textLine");
        child.set_volume(Volume {
            width: Dimension::Auto,
            height: Dimension::Cells(1),
        })?;
        restyle(&child, |style| {
            style.auto_size = true;
            style.background = Some(Color::Red);
        })?;
        child.set_position(Position::new(0, row as i32))?;
        child.set_text(line)?;
        lines.push(child);
    }
    text.insert(&lines)?;

    let cursor = Arc::new(Mutex::new(None::<usize>));
    text.add_event_listener(EventKind::KeyPressed, move |node, _| {
        let Ok(Some(key)) = node.keyboard_event() else {
            return;
        };
        let mut index = cursor.lock().unwrap_or_else(|e| e.into_inner());
        match key.key.as_str() {
            "ArrowUp" => *index = index.map(|i| i.saturating_sub(1)),
            "ArrowDown" => *index = Some(index.map_or(0, |i| (i + 1).min(lines.len() - 1))),
            "Escape" => {
                if let Ok(Some(parent)) = node.parent() {
                    node.engine().select(&parent);
                }
            }
            _ => {}
        }
        for (i, line) in lines.iter().enumerate() {
            let lit = *index == Some(i);
            let _ = restyle(line, |style| {
                style.background = Some(if lit { Color::Green } else { Color::Red });
            });
        }
    })?;

    let reader = text.clone();
    node.add_event_listener(EventKind::Selected, move |node, origin| {
        let engine = node.engine();
        if *origin != reader {
            engine.select(&reader);
        } else {
            engine.select(&engine.body());
            show(node, false);
        }
    })?;

    node.insert([&title(engine, "Electronic Reader")?, &text])?;
    Ok(node)
}

fn text_page(engine: &Engine) -> Result<Node> {
    let node = page(engine, Color::Green)?;
    restyle(&node, |style| {
        style.border = BorderType::Dotted;
        style.border_color = Some(Color::Black);
        style.text_color = Some(Color::Red);
    })?;
    node.set_text("This is page 3. Press 1 to go back")?;

    node.add_event_listener(EventKind::KeyPressed, |node, _| {
        let Ok(Some(key)) = node.keyboard_event() else {
            return;
        };
        let rune = key.rune.map(String::from).unwrap_or(key.key);
        let _ = node.set_text(format!("you pressed: {rune}"));
        if key.rune == Some('1') {
            let engine = node.engine();
            engine.select(&engine.body());
            show(node, false);
        }
    })?;
    Ok(node)
}
