// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Reusable egui components structured for MVU-style updates.

pub mod field_editor;
