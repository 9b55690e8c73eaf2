// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made behaviors.

mod text_entry;

pub use text_entry::TextEntry;
