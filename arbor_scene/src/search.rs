// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree search utilities.

use crate::error::SceneResult;
use crate::scene::Scene;
use crate::types::NodeId;

impl<S: 'static> Scene<S> {
    /// Collect the descendants of `container` accepted by `predicate`.
    ///
    /// The walk is depth-first in paint order and skips invisible subtrees. A
    /// matching container is still descended into. With `first_only`, the walk
    /// stops at the first match.
    ///
    /// Fails if `container` is stale or not a container.
    pub fn find_children(
        &self,
        container: NodeId,
        mut predicate: impl FnMut(&Self, NodeId) -> bool,
        first_only: bool,
    ) -> SceneResult<Vec<NodeId>> {
        self.container_of(container)?;
        let mut found = Vec::new();
        self.collect_matching(container, &mut predicate, first_only, &mut found);
        Ok(found)
    }

    /// First descendant of `container` accepted by `predicate`, in the order of
    /// [`Scene::find_children`].
    pub fn find_child(
        &self,
        container: NodeId,
        predicate: impl FnMut(&Self, NodeId) -> bool,
    ) -> SceneResult<Option<NodeId>> {
        Ok(self
            .find_children(container, predicate, true)?
            .into_iter()
            .next())
    }

    /// Returns true once the walk should stop.
    fn collect_matching(
        &self,
        container: NodeId,
        predicate: &mut impl FnMut(&Self, NodeId) -> bool,
        first_only: bool,
        found: &mut Vec<NodeId>,
    ) -> bool {
        let Some(c) = self.node(container).and_then(|n| n.container.as_ref()) else {
            return false;
        };
        for child in c.children.paint_order() {
            if !self.is_visible(child) {
                continue;
            }
            if predicate(self, child) {
                found.push(child);
                if first_only {
                    return true;
                }
            }
            if self.collect_matching(child, predicate, first_only, found) {
                return true;
            }
        }
        false
    }

    /// The root the node hangs from, if that root is a container.
    pub fn window_of(&self, id: NodeId) -> Option<NodeId> {
        let root = self.ancestors(id).last()?;
        self.is_container(root).then_some(root)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SceneError;
    use crate::scene::{Element, Scene};
    use crate::types::WindowFlags;
    use kurbo::Size;

    #[test]
    fn depth_first_skips_invisible_subtrees() {
        let mut scene: Scene = Scene::new();
        let root = scene
            .insert(None, Element::window(WindowFlags::FULLSCREEN))
            .unwrap();
        let panel = scene.insert(Some(root), Element::panel().with_z_index(1)).unwrap();
        let nested = scene
            .insert(Some(panel), Element::leaf().focusable())
            .unwrap();
        let hidden = scene
            .insert(Some(root), Element::panel().with_z_index(2).hidden())
            .unwrap();
        scene
            .insert(Some(hidden), Element::leaf().focusable())
            .unwrap();
        let late = scene
            .insert(Some(root), Element::leaf().with_z_index(3).focusable())
            .unwrap();

        let all = scene
            .find_children(root, |s, id| s.is_focusable(id), false)
            .unwrap();
        assert_eq!(all, [nested, late]);

        let everything = scene.find_children(root, |_, _| true, false).unwrap();
        assert_eq!(everything, [panel, nested, late]);
    }

    #[test]
    fn first_only_stops_early() {
        let mut scene: Scene = Scene::new();
        let root = scene
            .insert(None, Element::window(WindowFlags::FULLSCREEN))
            .unwrap();
        let big = Size::new(50.0, 50.0);
        let first = scene
            .insert(Some(root), Element::leaf().with_size(big).with_z_index(1))
            .unwrap();
        scene
            .insert(Some(root), Element::leaf().with_size(big).with_z_index(2))
            .unwrap();

        let mut calls = 0;
        let found = scene
            .find_child(root, |s, id| {
                calls += 1;
                s.size(id) == Some(big)
            })
            .unwrap();
        assert_eq!(found, Some(first));
        assert_eq!(calls, 1);
        assert_eq!(scene.find_child(root, |_, _| false).unwrap(), None);
    }

    #[test]
    fn invalid_roots_are_rejected() {
        let mut scene: Scene = Scene::new();
        let root = scene
            .insert(None, Element::window(WindowFlags::FULLSCREEN))
            .unwrap();
        let leaf = scene.insert(Some(root), Element::leaf()).unwrap();
        assert_eq!(
            scene.find_children(leaf, |_, _| true, false),
            Err(SceneError::NotAContainer(leaf))
        );
        scene.remove(root);
        scene.update(root, 0);
        assert_eq!(
            scene.find_child(root, |_, _| true),
            Err(SceneError::StaleNode(root))
        );
    }

    #[test]
    fn window_of_walks_to_the_root() {
        let mut scene: Scene = Scene::new();
        let root = scene
            .insert(None, Element::window(WindowFlags::FULLSCREEN))
            .unwrap();
        let panel = scene.insert(Some(root), Element::panel()).unwrap();
        let leaf = scene.insert(Some(panel), Element::leaf()).unwrap();
        assert_eq!(scene.window_of(leaf), Some(root));
        assert_eq!(scene.window_of(root), Some(root));

        let loose = scene.insert(None, Element::leaf()).unwrap();
        assert_eq!(scene.window_of(loose), None);
    }
}
