//! Single-line transfer strings for exchanging designs between commands.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use thiserror::Error;
use track_design_core::TrackDesign;

const TRANSFER_DOMAIN: &str = "design";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the kind and payload.
pub(crate) const TRANSFER_HEADER: &str = "design:v1";
/// Delimiter used to separate the prefix, kind and payload.
const FIELD_DELIMITER: char = ':';

/// Layout family a transfer string carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DesignKind {
    /// Track pieces with entrances and exits.
    Ride,
    /// Maze cells with their huts.
    Maze,
}

impl DesignKind {
    fn of(design: &TrackDesign) -> Self {
        if design.ride_type.is_maze() {
            DesignKind::Maze
        } else {
            DesignKind::Ride
        }
    }

    const fn label(self) -> &'static str {
        match self {
            DesignKind::Ride => "ride",
            DesignKind::Maze => "maze",
        }
    }

    fn parse(label: &str) -> Option<Self> {
        match label {
            "ride" => Some(DesignKind::Ride),
            "maze" => Some(DesignKind::Maze),
            _ => None,
        }
    }
}

/// Errors raised while encoding or decoding transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("design string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("design string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("design string is missing the version")]
    MissingVersion,
    /// The kind segment was missing.
    #[error("design string is missing the design kind")]
    MissingKind,
    /// The payload segment was missing.
    #[error("design string is missing the payload")]
    MissingPayload,
    /// The string used an unexpected prefix.
    #[error("design prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The string used an unsupported version.
    #[error("design version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The kind segment named no known kind.
    #[error("design kind '{0}' is not supported")]
    InvalidKind(String),
    /// The kind segment disagrees with the decoded ride type.
    #[error("design string is labelled '{label}' but holds a {actual} design")]
    KindMismatch {
        /// Kind named by the string.
        label: String,
        /// Kind of the decoded design.
        actual: &'static str,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode design payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload could not be converted from or to JSON.
    #[error("could not convert design payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Encodes a design into a single-line string.
pub(crate) fn encode(design: &TrackDesign) -> Result<String, TransferError> {
    let json = serde_json::to_vec(design)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    let kind = DesignKind::of(design).label();
    Ok(format!("{TRANSFER_HEADER}{FIELD_DELIMITER}{kind}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a design from its transfer string.
pub(crate) fn decode(value: &str) -> Result<TrackDesign, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
    let version = parts.next().ok_or(TransferError::MissingVersion)?;
    let kind = parts.next().ok_or(TransferError::MissingKind)?;
    let payload = parts.next().ok_or(TransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }
    let expected = DesignKind::parse(kind).ok_or_else(|| TransferError::InvalidKind(kind.to_owned()))?;

    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let design: TrackDesign = serde_json::from_slice(&bytes)?;
    let actual = DesignKind::of(&design);
    if actual != expected {
        return Err(TransferError::KindMismatch {
            label: kind.to_owned(),
            actual: actual.label(),
        });
    }
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::{
        Direction, MazeElement, MazeEntry, RelativeTile, RideType, TrackDesignTrackElement,
        TrackFlags, TrackPiece,
    };

    fn ride() -> TrackDesign {
        let mut design = TrackDesign::new(RideType::SteelCoaster);
        design.name = "Loop".to_owned();
        design.track_elements = vec![
            TrackDesignTrackElement {
                piece: TrackPiece::Flat,
                flags: TrackFlags::default(),
            };
            3
        ];
        design
    }

    #[test]
    fn ride_designs_survive_transfer() {
        let design = ride();
        let encoded = encode(&design).expect("design encodes");
        assert!(encoded.starts_with("design:v1:ride:"));
        assert!(!encoded.contains('\n'));
        assert_eq!(decode(&format!("  {encoded}\n")).expect("design decodes"), design);
    }

    #[test]
    fn maze_designs_are_labelled_as_mazes() {
        let mut design = TrackDesign::new(RideType::Maze);
        design.maze_elements.push(MazeElement::Cell {
            position: RelativeTile::new(0, 0),
            entry: MazeEntry::from_bits(0x00FF),
        });
        design.maze_elements.push(MazeElement::Entrance {
            position: RelativeTile::new(-1, 0),
            direction: Direction::East,
        });
        let encoded = encode(&design).expect("design encodes");
        assert!(encoded.starts_with("design:v1:maze:"));
        assert_eq!(decode(&encoded).expect("design decodes"), design);
    }

    #[test]
    fn malformed_segments_are_reported() {
        assert!(matches!(decode("   "), Err(TransferError::EmptyPayload)));
        assert!(matches!(decode("design"), Err(TransferError::MissingVersion)));
        assert!(matches!(decode("design:v1"), Err(TransferError::MissingKind)));
        assert!(matches!(decode("design:v1:ride"), Err(TransferError::MissingPayload)));
        assert!(matches!(
            decode("layout:v1:ride:e30"),
            Err(TransferError::InvalidPrefix(prefix)) if prefix == "layout"
        ));
        assert!(matches!(
            decode("design:v2:ride:e30"),
            Err(TransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(decode("design:v1:flat:e30"), Err(TransferError::InvalidKind(_))));
        assert!(matches!(decode("design:v1:ride:!!!"), Err(TransferError::InvalidEncoding(_))));
        assert!(matches!(decode("design:v1:ride:e30"), Err(TransferError::InvalidPayload(_))));
    }

    #[test]
    fn mislabelled_kind_is_rejected() {
        let encoded = encode(&ride()).expect("design encodes");
        let relabelled = encoded.replacen(":ride:", ":maze:", 1);
        assert!(matches!(
            decode(&relabelled),
            Err(TransferError::KindMismatch { actual: "ride", .. })
        ));
    }
}
