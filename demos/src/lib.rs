// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the Arbor demos: a text draw target and a label behavior.
//!
//! Run the demos with:
//! - `cargo run -p arbor_demos --example login_form`
//! - `cargo run -p arbor_demos --example orbit`

use arbor_scene::{Behavior, NodeView};
use kurbo::Point;

/// Draw target that records one line per drawn node.
#[derive(Clone, Debug, Default)]
pub struct TextSurface {
    lines: Vec<String>,
}

impl TextSurface {
    /// Record `label` at the node's world origin. Focused nodes are marked with `>`.
    pub fn line(&mut self, node: &NodeView, label: &str) {
        let origin = node.transform * Point::ORIGIN;
        let marker = if node.is_focused() { '>' } else { ' ' };
        self.lines
            .push(format!("{marker} ({:>6.1}, {:>6.1}) {label}", origin.x, origin.y));
    }

    /// Print the recorded frame under a heading and start a new one.
    pub fn flush(&mut self, heading: &str) {
        println!("-- {heading}");
        for line in self.lines.drain(..) {
            println!("{line}");
        }
    }
}

/// Static text.
#[derive(Clone, Debug)]
pub struct Label(pub String);

impl Label {
    /// Label with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl Behavior<TextSurface> for Label {
    fn draw(&self, node: &NodeView, surface: &mut TextSurface) {
        surface.line(node, &self.0);
    }
}
