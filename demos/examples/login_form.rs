// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A login form driven by scripted input.
//!
//! Shows:
//! - pointer focus and key routing into text fields,
//! - Tab and the window's Enter fallback walking and pressing the focus ring,
//! - a modal dialog opened from a handler, animated in, and closed with Back.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p arbor_demos --example login_form`

use arbor_demos::{Label, TextSurface};
use arbor_scene::widgets::TextEntry;
use arbor_scene::{
    Behavior, Element, EventCx, Key, KeyEvent, NodeView, Scene, TouchEvent, TouchPhase,
    WindowFlags,
};
use kurbo::{Point, Size, Vec2};

/// A labelled text entry.
struct Field {
    label: &'static str,
    entry: TextEntry,
}

impl Behavior<TextSurface> for Field {
    fn draw(&self, node: &NodeView, surface: &mut TextSurface) {
        let text = format!("{}: {}", self.label, self.entry.display_text());
        surface.line(node, &text);
    }

    fn touch(&mut self, cx: &mut EventCx<'_, TextSurface>, event: &TouchEvent) -> bool {
        Behavior::<TextSurface>::touch(&mut self.entry, cx, event)
    }

    fn key(&mut self, cx: &mut EventCx<'_, TextSurface>, event: &KeyEvent) -> bool {
        Behavior::<TextSurface>::key(&mut self.entry, cx, event)
    }

    fn focus_changed(&mut self, cx: &mut EventCx<'_, TextSurface>, focused: bool) {
        Behavior::<TextSurface>::focus_changed(&mut self.entry, cx, focused);
    }

    fn removed(&mut self, cx: &mut EventCx<'_, TextSurface>) {
        Behavior::<TextSurface>::removed(&mut self.entry, cx);
    }
}

/// Opens a welcome dialog in its window when pressed.
struct SignIn;

impl Behavior<TextSurface> for SignIn {
    fn draw(&self, node: &NodeView, surface: &mut TextSurface) {
        surface.line(node, "[ Sign in ]");
    }

    fn touch(&mut self, cx: &mut EventCx<'_, TextSurface>, event: &TouchEvent) -> bool {
        if event.phase == TouchPhase::Up {
            self.press(cx);
        }
        true
    }

    fn press(&mut self, cx: &mut EventCx<'_, TextSurface>) {
        let Some(window) = cx.scene().parent(cx.id()) else {
            return;
        };
        let scene = cx.scene_mut();
        let dialog = Element::window(WindowFlags::CLOSE_BUTTON)
            .with_position(Vec2::new(60.0, 240.0))
            .with_size(Size::new(200.0, 80.0))
            .with_z_index(10)
            .with_behavior(Label::new("Welcome! (Back closes)"));
        match scene.insert(Some(window), dialog) {
            Ok(dialog) => {
                tracing::info!(?dialog, "opened dialog");
                scene.move_to(dialog, Vec2::new(60.0, 60.0), 200, None);
            }
            Err(err) => tracing::warn!(%err, "could not open dialog"),
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut scene: Scene<TextSurface> = Scene::new();
    let mut surface = TextSurface::default();

    let window = scene
        .insert(
            None,
            Element::window(WindowFlags::FULLSCREEN | WindowFlags::FOCUSABLE)
                .with_size(Size::new(320.0, 200.0))
                .with_behavior(Label::new("Login")),
        )
        .expect("root insert cannot fail");

    let field_size = Size::new(200.0, 20.0);
    let name = scene
        .insert(
            Some(window),
            Element::leaf()
                .with_position(Vec2::new(10.0, 40.0))
                .with_size(field_size)
                .focusable()
                .with_behavior(Field {
                    label: "name",
                    entry: TextEntry::new(),
                }),
        )
        .expect("window accepts children");
    scene
        .insert(
            Some(window),
            Element::leaf()
                .with_position(Vec2::new(10.0, 70.0))
                .with_size(field_size)
                .focusable()
                .with_behavior(Field {
                    label: "password",
                    entry: TextEntry::new().with_mask('*'),
                }),
        )
        .expect("window accepts children");
    scene
        .insert(
            Some(window),
            Element::leaf()
                .with_position(Vec2::new(10.0, 110.0))
                .with_size(Size::new(80.0, 24.0))
                .focusable()
                .with_behavior(SignIn),
        )
        .expect("window accepts children");

    let mut now_ms = 0;
    let mut frame = |scene: &mut Scene<TextSurface>, surface: &mut TextSurface, heading: &str| {
        now_ms += 16;
        scene.update(window, now_ms);
        scene.draw(window, surface);
        surface.flush(heading);
    };

    frame(&mut scene, &mut surface, "initial");

    // Click the name field, type, then Tab into the password field.
    let click = Point::new(20.0, 45.0);
    scene.touch(window, &TouchEvent::down(click));
    scene.touch(window, &TouchEvent::up(click));
    for c in "ada".chars() {
        scene.key(window, &KeyEvent::character(c));
    }
    scene.key(window, &KeyEvent::up(Key::Tab));
    for c in "hunter2".chars() {
        scene.key(window, &KeyEvent::character(c));
    }
    frame(&mut scene, &mut surface, "typed");

    // Tab onto the button and press it through the window's Enter fallback.
    scene.key(window, &KeyEvent::up(Key::Tab));
    scene.key(window, &KeyEvent::up(Key::Enter));
    for _ in 0..14 {
        frame(&mut scene, &mut surface, "dialog sliding in");
    }

    // Back closes the modal dialog; the next frame prunes it.
    scene.key(window, &KeyEvent::up(Key::Back));
    frame(&mut scene, &mut surface, "dialog closed");

    if let Some(field) = scene.behavior::<Field>(name) {
        println!("signed in as {:?}", field.entry.text());
    }
}
