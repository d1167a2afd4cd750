// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the error reporter.
//!
//! Uses wiremock to stand in for the recording service and checks the exact
//! requests the reporter sends.

mod common;
mod test_wrap;
