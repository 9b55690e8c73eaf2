// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested transforms: a moon orbiting a planet orbiting a sun.
//!
//! Each body hangs off a rotating arm panel, so its world position composes every
//! ancestor's rotation. The demo animates the arms with `rotate_to`, then probes
//! hit testing and coordinate mapping on the rotated moon.
//!
//! Run:
//! - `cargo run -p arbor_demos --example orbit`

use arbor_demos::{Label, TextSurface};
use arbor_scene::{Element, Scene, TouchEvent, WindowFlags};
use kurbo::{Point, Size, Vec2};

fn main() {
    tracing_subscriber::fmt::init();

    let mut scene: Scene<TextSurface> = Scene::new();
    let mut surface = TextSurface::default();

    let sky = scene
        .insert(None, Element::window(WindowFlags::FULLSCREEN))
        .expect("root insert cannot fail");
    let sun = scene
        .insert(
            Some(sky),
            Element::panel()
                .with_position(Vec2::new(200.0, 200.0))
                .with_behavior(Label::new("sun")),
        )
        .expect("window accepts children");
    let planet_arm = scene
        .insert(Some(sun), Element::panel())
        .expect("panel accepts children");
    let planet = scene
        .insert(
            Some(planet_arm),
            Element::panel()
                .with_position(Vec2::new(120.0, 0.0))
                .with_behavior(Label::new("planet")),
        )
        .expect("panel accepts children");
    let moon_arm = scene
        .insert(Some(planet), Element::panel())
        .expect("panel accepts children");
    let moon = scene
        .insert(
            Some(moon_arm),
            Element::leaf()
                .with_position(Vec2::new(30.0, 0.0))
                .with_size(Size::new(10.0, 10.0))
                .with_scale(0.5)
                .with_behavior(Label::new("moon")),
        )
        .expect("panel accepts children");
    scene.set_on_touch(moon, |event| {
        tracing::info!(position = ?event.position, "moon touched");
        true
    });

    // A quarter turn for the planet. The moon takes the long way to 270 degrees
    // instead of turning back by 90.
    scene.rotate_to(planet_arm, 90.0, 400, None);
    scene.rotate_to_with(
        moon_arm,
        270.0,
        false,
        400,
        Some(Box::new(|| tracing::info!("moon finished turning"))),
    );

    let mut now_ms = 0;
    while now_ms <= 480 {
        scene.update(sky, now_ms);
        scene.draw(sky, &mut surface);
        surface.flush(&format!("t = {now_ms} ms"));
        now_ms += 80;
    }

    let centre = scene
        .screen_point(moon, Point::new(5.0, 5.0))
        .unwrap_or(Point::ORIGIN);
    println!("moon centre in world space: {centre:?}");
    println!("back in moon space: {:?}", scene.client_point(moon, centre));
    println!(
        "moon world rotation {:?}, scale {:?}",
        scene.actual_rotation(moon),
        scene.actual_scale(moon)
    );
    println!("touch consumed: {}", scene.touch(sky, &TouchEvent::down(centre)));
}
