use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use lifegrid_core::{BoundaryPolicy, CellCoord, GridDimensions, GridSnapshot};
use lifegrid_world::{query, LifeGrid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "life";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "life:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Portable description of a single generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TransferSnapshot {
    pub(crate) snapshot: GridSnapshot,
    pub(crate) boundary: BoundaryPolicy,
    pub(crate) generation: u64,
}

impl TransferSnapshot {
    /// Captures the current generation of the grid.
    pub(crate) fn capture(grid: &LifeGrid) -> Self {
        Self {
            snapshot: grid.snapshot(),
            boundary: query::boundary_policy(grid),
            generation: query::generation(grid),
        }
    }

    /// Rebuilds a grid holding the captured generation.
    pub(crate) fn restore(&self, boundary: BoundaryPolicy) -> LifeGrid {
        LifeGrid::from_snapshot(&self.snapshot, boundary, self.generation)
    }

    /// Encodes the snapshot into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, SnapshotTransferError> {
        let payload = SerializableSnapshot {
            boundary: self.boundary,
            generation: self.generation,
            cells: self
                .snapshot
                .live_cells()
                .into_iter()
                .map(|cell| (cell.row(), cell.column()))
                .collect(),
        };
        let json = serde_json::to_vec(&payload).map_err(SnapshotTransferError::Serialization)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        let dimensions = self.snapshot.dimensions();
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            dimensions.rows(),
            dimensions.columns()
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, SnapshotTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SnapshotTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().unwrap_or_default();
        let version = parts.next().ok_or(SnapshotTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(SnapshotTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(SnapshotTransferError::MissingPayload)?;
        if parts.next().is_some() {
            return Err(SnapshotTransferError::TrailingSegments);
        }

        if domain != SNAPSHOT_DOMAIN {
            return Err(SnapshotTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotTransferError::UnsupportedVersion(
                version.to_owned(),
            ));
        }

        let dimensions = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(SnapshotTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(SnapshotTransferError::InvalidPayload)?;

        let mut cells = Vec::with_capacity(decoded.cells.len());
        for (row, column) in decoded.cells {
            let cell = CellCoord::new(row, column);
            if dimensions.index(cell).is_none() {
                return Err(SnapshotTransferError::CellOutOfRange { row, column });
            }
            cells.push(cell);
        }

        Ok(Self {
            snapshot: GridSnapshot::from_live_cells(dimensions, cells),
            boundary: decoded.boundary,
            generation: decoded.generation,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    boundary: BoundaryPolicy,
    generation: u64,
    cells: Vec<(u32, u32)>,
}

/// Errors that can occur while encoding or decoding snapshot strings.
#[derive(Debug, Error)]
pub(crate) enum SnapshotTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("snapshot string was empty")]
    EmptyPayload,
    /// The encoded snapshot did not contain a version segment.
    #[error("snapshot string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("snapshot string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("snapshot string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot carried segments after the payload.
    #[error("snapshot string has unexpected segments after the payload")]
    TrailingSegments,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("snapshot prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("snapshot version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode snapshot payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse snapshot payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// A live cell lies outside the encoded dimensions.
    #[error("live cell ({row}, {column}) lies outside the grid")]
    CellOutOfRange {
        /// Row of the offending cell.
        row: u32,
        /// Column of the offending cell.
        column: u32,
    },
    /// The payload could not be serialised.
    #[error("could not serialise snapshot payload: {0}")]
    Serialization(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<GridDimensions, SnapshotTransferError> {
    let invalid = || SnapshotTransferError::InvalidDimensions(dimensions.to_owned());

    let (rows, columns) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let rows = rows.trim().parse::<i64>().map_err(|_| invalid())?;
    let columns = columns.trim().parse::<i64>().map_err(|_| invalid())?;

    GridDimensions::new(rows, columns).map_err(|_| invalid())
}
