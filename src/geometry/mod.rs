//! Drop-zone codes and crystal well device coordinates.
//!
//! A drop zone is one cell of a 3x3 grid centred on the well. Corner zones
//! accept both letter orders (`ul` and `lu` are the same zone).

pub mod services;
pub mod views;

use crate::common::errors::TrackingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Every stored drop position name, synonyms included
pub const DROP_POSITION_CODES: [&str; 13] = [
    "c", "u", "d", "l", "r", "ul", "lu", "ur", "ru", "dl", "ld", "dr", "rd",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DropZone {
    Center,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Lower-cased code with whitespace and surrounding brackets removed
pub fn normalize_code(code: &str) -> String {
    code.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_ascii_lowercase()
}

impl DropZone {
    /// Offset from the well centre in microns, `y` growing downwards
    pub fn offset(self, step: i32) -> (i32, i32) {
        let (dx, dy) = match self {
            DropZone::Center => (0, 0),
            DropZone::Up => (0, -1),
            DropZone::Down => (0, 1),
            DropZone::Left => (-1, 0),
            DropZone::Right => (1, 0),
            DropZone::UpLeft => (-1, -1),
            DropZone::UpRight => (1, -1),
            DropZone::DownLeft => (-1, 1),
            DropZone::DownRight => (1, 1),
        };
        (dx * step, dy * step)
    }

    pub fn canonical_code(self) -> &'static str {
        match self {
            DropZone::Center => "c",
            DropZone::Up => "u",
            DropZone::Down => "d",
            DropZone::Left => "l",
            DropZone::Right => "r",
            DropZone::UpLeft => "ul",
            DropZone::UpRight => "ur",
            DropZone::DownLeft => "dl",
            DropZone::DownRight => "dr",
        }
    }
}

impl FromStr for DropZone {
    type Err = TrackingError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match normalize_code(code).as_str() {
            "" | "c" => Ok(DropZone::Center),
            "u" => Ok(DropZone::Up),
            "d" => Ok(DropZone::Down),
            "l" => Ok(DropZone::Left),
            "r" => Ok(DropZone::Right),
            "ul" | "lu" => Ok(DropZone::UpLeft),
            "ur" | "ru" => Ok(DropZone::UpRight),
            "dl" | "ld" => Ok(DropZone::DownLeft),
            "dr" | "rd" => Ok(DropZone::DownRight),
            other => Err(TrackingError::Configuration {
                message: format!("unrecognised drop-zone code '{other}'"),
            }),
        }
    }
}
