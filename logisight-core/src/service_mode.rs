// Copyright 2025 Logisight Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Service-mode display priority
//!
//! Fastest service first. Modes missing from the table share the default
//! rank and are ordered by name among themselves.

use std::cmp::Ordering;

pub const SERVICE_MODE_PRIORITY: &[(&str, u8)] = &[
    ("same day", 1),
    ("express", 2),
    ("two day", 3),
    ("standard", 4),
];

pub const DEFAULT_SERVICE_MODE_RANK: u8 = 5;

/// Rank of a service mode name (exact, case-sensitive match)
pub fn service_mode_rank(mode: &str) -> u8 {
    SERVICE_MODE_PRIORITY
        .iter()
        .find(|(name, _)| *name == mode)
        .map(|(_, rank)| *rank)
        .unwrap_or(DEFAULT_SERVICE_MODE_RANK)
}

/// Rank first, then name
pub fn compare_service_modes(a: &str, b: &str) -> Ordering {
    service_mode_rank(a)
        .cmp(&service_mode_rank(b))
        .then_with(|| a.cmp(b))
}
