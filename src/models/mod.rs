// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Domain layer: pure data types and validation helpers shared between UI and form persistence.

pub mod field;
pub mod form;
