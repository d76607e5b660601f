//! # Loading Errors
//!
//! Recoverable failures while reading room descriptors and config files.
//! Runtime invariant violations live in [`kestrel_core::EcsError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a room.
#[derive(Error, Debug)]
pub enum RoomError {
    /// The room file could not be read.
    #[error("failed to read room {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The room file is not a valid descriptor.
    #[error("invalid room descriptor: {0}")]
    Parse(#[from] toml::de::Error),

    /// The room has a zero dimension or tile size.
    #[error("room must have positive dimensions, got {width}x{height} with tile size {tile_size}")]
    EmptyRoom {
        /// Columns.
        width: u32,
        /// Rows.
        height: u32,
        /// Tile side in pixels.
        tile_size: u32,
    },

    /// The room does not fit in world pixels or exceeds the cell limit.
    #[error("room of {width}x{height} tiles of {tile_size}px is too large")]
    TooLarge {
        /// Columns.
        width: u32,
        /// Rows.
        height: u32,
        /// Tile side in pixels.
        tile_size: u32,
    },

    /// A per-cell layer does not match the room size.
    #[error("`{layer}` has {actual} cells, room has {expected}")]
    LayerSize {
        /// Layer name.
        layer: &'static str,
        /// `width * height`.
        expected: usize,
        /// Cells found.
        actual: usize,
    },

    /// A tile index below `-1`.
    #[error("tile {index} has invalid texture {value}")]
    InvalidTile {
        /// Row-major cell index.
        index: usize,
        /// Offending value.
        value: i32,
    },

    /// A platform without any waypoint.
    #[error("platform {index} has no waypoints")]
    EmptyWaypoints {
        /// Platform index in the descriptor.
        index: usize,
    },

    /// A rectangle with a non-positive side.
    #[error("{layer} {index} has an empty rectangle")]
    EmptyRect {
        /// Layer name.
        layer: &'static str,
        /// Index in the layer.
        index: usize,
    },
}

/// Result type for room loading.
pub type RoomResult<T> = Result<T, RoomError>;

/// Errors raised while loading the frame driver configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
