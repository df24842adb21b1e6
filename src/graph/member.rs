//! Family member record and identifier.
//!
//! A member is one row of the family table. Only `id` and `father_id` shape
//! the tree; `generation` and `sibling_order` are used for coloring, labels
//! and ordering, and everything else is carried through for display.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Stable member identifier, as assigned by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl MemberId {
    /// Create a new MemberId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MemberId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<MemberId> for u32 {
    #[inline]
    fn from(id: MemberId) -> Self {
        id.0
    }
}

/// Recorded gender. Stored as the characters used by the family table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "男")]
    Male,
    #[serde(rename = "女")]
    Female,
}

impl Gender {
    /// Label used in statistics and tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "男",
            Self::Female => "女",
        }
    }
}

fn default_alive() -> bool {
    true
}

/// One family member record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub generation: Option<i32>,
    #[serde(default)]
    pub sibling_order: Option<i32>,
    #[serde(default)]
    pub father_id: Option<MemberId>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default = "default_alive")]
    pub is_alive: bool,
    #[serde(default)]
    pub spouse: Option<String>,
    #[serde(default)]
    pub official_position: Option<String>,
    #[serde(default)]
    pub residence_place: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl FamilyMember {
    /// Minimal record with only the structural fields set.
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            generation: None,
            sibling_order: None,
            father_id: None,
            gender: None,
            is_alive: true,
            spouse: None,
            official_position: None,
            residence_place: None,
            birthday: None,
            death_date: None,
            remarks: None,
            updated_at: None,
        }
    }

    pub fn with_father(mut self, father_id: impl Into<MemberId>) -> Self {
        self.father_id = Some(father_id.into());
        self
    }

    pub fn with_generation(mut self, generation: i32) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_sibling_order(mut self, order: i32) -> Self {
        self.sibling_order = Some(order);
        self
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birthday.map(|d| d.year())
    }

    pub fn death_year(&self) -> Option<i32> {
        self.death_date.map(|d| d.year())
    }
}
