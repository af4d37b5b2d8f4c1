// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

mod memory;

pub use memory::InMemoryDocumentStore;
