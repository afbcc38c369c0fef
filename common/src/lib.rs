// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common module for the mock location injector
//!
//! Provides the domain types that are shared across every module.

pub mod fix;
pub mod position;
