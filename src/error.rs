//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::graph::MemberId;

pub type Result<T> = std::result::Result<T, LineageError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineageError {
    #[error("member not found: {member_id}")]
    NotFound { member_id: MemberId },

    #[error("no path between {start} and {end}: they share no common ancestor")]
    NoPath { start: MemberId, end: MemberId },

    #[error("father_id chain through {member_id} forms a cycle")]
    CyclicData { member_id: MemberId },

    #[error("duplicate member id: {member_id}")]
    DuplicateMember { member_id: MemberId },

    #[error("invalid member {member_id}: {reason}")]
    InvalidMember { member_id: MemberId, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LineageError {
    /// The member id the error is about, when there is exactly one.
    #[must_use]
    pub fn member_id(&self) -> Option<MemberId> {
        match self {
            Self::NotFound { member_id }
            | Self::CyclicData { member_id }
            | Self::DuplicateMember { member_id }
            | Self::InvalidMember { member_id, .. } => Some(*member_id),
            Self::NoPath { .. } | Self::Serialization(_) => None,
        }
    }
}

impl From<serde_wasm_bindgen::Error> for LineageError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LineageError::NotFound {
            member_id: MemberId(7),
        };
        assert_eq!(err.to_string(), "member not found: 7");

        let err = LineageError::NoPath {
            start: MemberId(1),
            end: MemberId(9),
        };
        assert_eq!(
            err.to_string(),
            "no path between 1 and 9: they share no common ancestor"
        );
    }

    #[test]
    fn test_member_id_accessor() {
        let err = LineageError::CyclicData {
            member_id: MemberId(3),
        };
        assert_eq!(err.member_id(), Some(MemberId(3)));
        assert_eq!(LineageError::Serialization("x".into()).member_id(), None);
    }
}
