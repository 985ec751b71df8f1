// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod config;
pub mod discover;
pub mod error;
pub mod fanout;
pub mod registry;
pub mod test_support;
pub mod worker;
