// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the Latta recorder.
//!
//! Every request leaves the process from the thread that observed the error,
//! so the client is the blocking flavour of `reqwest`.

mod client;

pub use client::{builder, platform, user_agent};
