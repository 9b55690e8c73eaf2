// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Transform: hierarchical 2D affine transforms with a lazy, versioned cache.
//!
//! Each node of a scene owns one [`AffineTransform`]: a local position, a rotation in
//! degrees and a non-uniform scale, relative to an optional parent. The transforms
//! live in a [`TransformArena`] which resolves parent links by [`TransformId`].
//!
//! - Local matrix: scale, then rotate, then translate.
//! - World matrix: `parent_world * local`, baked on first read and cached.
//! - A cache is stale when the transform itself changed or when any ancestor changed
//!   or rebaked since it was last baked. Ancestors carry a bake counter ("version")
//!   that children compare against, so a parent rebaked by someone else is still
//!   observed.
//! - Setters ignore changes below the configured [`Epsilons`]. The comparison is
//!   against the values that produced the cache, so tiny steps cannot pile up
//!   unnoticed.
//! - The inverse is computed on demand; singular transforms have none.
//!
//! ## Example
//!
//! ```rust
//! use arbor_transform::{AffineTransform, Epsilons, TransformArena};
//! use kurbo::{Point, Vec2};
//!
//! let mut arena = TransformArena::with_epsilons(Epsilons::DEFAULT);
//! let window = arena.insert(AffineTransform::from_position(Vec2::new(100.0, 50.0), 0.0, 1.0));
//! let button = arena.insert(AffineTransform::from_position(Vec2::new(20.0, 10.0), 0.0, 1.0));
//! arena.set_parent(button, Some(window));
//!
//! // A click at (125, 65) lands 5/5 into the button.
//! let local = arena.client_point(button, Point::new(125.0, 65.0)).unwrap();
//! assert!((local.x - 5.0).abs() < 1e-9 && (local.y - 5.0).abs() < 1e-9);
//!
//! // Moving the window invalidates the button.
//! arena.set_position(window, Vec2::new(0.0, 0.0));
//! assert!(arena.is_stale(button));
//! ```
//!
//! Reads go through `&self` and refresh the cache in place, so an arena is
//! single-threaded.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `tracing`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
mod epsilon;
mod transform;

pub use arena::{TransformArena, TransformId};
pub use epsilon::Epsilons;
pub use transform::AffineTransform;
