// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instrumented behaviors shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::behavior::{Behavior, EventCx};
use crate::event::{KeyEvent, TouchEvent, ZoomEvent};

/// Shared record of hook calls, as `"<name>.<hook>"` strings.
#[derive(Clone, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub(crate) fn push(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Records every hook and consumes input as configured.
pub(crate) struct Probe {
    pub(crate) name: &'static str,
    log: Log,
    consume_touch: bool,
    consume_zoom: bool,
    consume_key: bool,
}

impl Probe {
    pub(crate) fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            consume_touch: false,
            consume_zoom: false,
            consume_key: false,
        }
    }

    pub(crate) fn consuming(mut self) -> Self {
        self.consume_touch = true;
        self.consume_zoom = true;
        self.consume_key = true;
        self
    }

    fn record(&self, hook: &str) {
        self.log.push(format!("{}.{hook}", self.name));
    }
}

impl Behavior<()> for Probe {
    fn update(&mut self, _cx: &mut EventCx<'_, ()>) {
        self.record("update");
    }

    fn touch(&mut self, _cx: &mut EventCx<'_, ()>, _event: &TouchEvent) -> bool {
        self.record("touch");
        self.consume_touch
    }

    fn zoom(&mut self, _cx: &mut EventCx<'_, ()>, _event: &ZoomEvent) -> bool {
        self.record("zoom");
        self.consume_zoom
    }

    fn key(&mut self, _cx: &mut EventCx<'_, ()>, _event: &KeyEvent) -> bool {
        self.record("key");
        self.consume_key
    }

    fn focus_changed(&mut self, _cx: &mut EventCx<'_, ()>, focused: bool) {
        self.record(if focused { "focus" } else { "blur" });
    }

    fn press(&mut self, _cx: &mut EventCx<'_, ()>) {
        self.record("press");
    }

    fn removed(&mut self, _cx: &mut EventCx<'_, ()>) {
        self.record("removed");
    }
}
