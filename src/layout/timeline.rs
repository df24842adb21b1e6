//! Lifespan timeline layout.
//!
//! Every member with a birthday becomes a horizontal bar from birth year to
//! death year (or to today). Bars are packed into tracks greedily: a bar goes
//! on the first track whose last bar ended at least `track_gap` years
//! earlier, otherwise it opens a new track.

use serde::{Deserialize, Serialize};

use super::Point;
use crate::graph::{FamilyMember, MemberId};

/// Members without a death date older than this are assumed deceased.
pub const ASSUMED_MAX_AGE: i32 = 100;

/// Lifespan drawn for an assumed-deceased member without a death date.
pub const ASSUMED_LIFESPAN: i32 = 80;

/// Years of padding on both ends of the axis.
const AXIS_PADDING_YEARS: i32 = 10;

const MARKER_STEP_YEARS: i32 = 10;

const MARKER_Y: f32 = -20.0;

/// Configuration for the timeline layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub pixels_per_year: f32,
    pub row_height: f32,
    /// Minimum years between two bars sharing a track.
    pub track_gap: i32,
    /// Space above the first track, reserved for year markers.
    pub header_height: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_year: 60.0,
            row_height: 50.0,
            track_gap: 2,
            header_height: 40.0,
        }
    }
}

/// One lifespan bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineItem {
    pub id: MemberId,
    pub name: String,
    pub start_year: i32,
    pub end_year: i32,
    pub is_alive: bool,
    pub track: usize,
    /// Top-left corner of the bar.
    pub position: Point,
    pub width: f32,
}

impl TimelineItem {
    /// Point a viewport should center on to show this bar.
    pub fn focus_point(&self) -> Point {
        Point::new(self.position.x + self.width / 2.0, self.position.y)
    }
}

/// A bar matched by a timeline search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineHit {
    pub id: MemberId,
    /// Where to center the viewport.
    pub focus: Point,
}

impl From<&TimelineItem> for TimelineHit {
    fn from(item: &TimelineItem) -> Self {
        Self {
            id: item.id,
            focus: item.focus_point(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearMarker {
    pub year: i32,
    pub position: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    /// Bars sorted by start year.
    pub items: Vec<TimelineItem>,
    pub year_markers: Vec<YearMarker>,
    pub min_year: i32,
    pub max_year: i32,
    pub track_count: usize,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First bar whose name contains the trimmed query.
    pub fn find_by_name(&self, query: &str) -> Option<&TimelineItem> {
        let needle = query.trim();
        if needle.is_empty() {
            return None;
        }
        self.items.iter().find(|item| item.name.contains(needle))
    }
}

/// A member reduced to the years the timeline draws.
struct Lifespan<'a> {
    member: &'a FamilyMember,
    start_year: i32,
    end_year: i32,
    is_alive: bool,
}

impl<'a> Lifespan<'a> {
    fn of(member: &'a FamilyMember, current_year: i32) -> Option<Self> {
        let start_year = member.birth_year()?;
        let (mut end_year, is_alive) = match member.death_year() {
            Some(death) => (death, false),
            None if current_year - start_year < ASSUMED_MAX_AGE => (current_year, true),
            None => (start_year + ASSUMED_LIFESPAN, false),
        };
        if end_year < start_year {
            end_year = start_year + 1;
        }
        Some(Self {
            member,
            start_year,
            end_year,
            is_alive,
        })
    }
}

/// Lay out lifespan bars for `members` as of `current_year`.
pub fn compute_timeline(
    members: &[FamilyMember],
    current_year: i32,
    config: &TimelineConfig,
) -> Timeline {
    let mut spans: Vec<Lifespan<'_>> = members
        .iter()
        .filter_map(|member| Lifespan::of(member, current_year))
        .collect();
    if spans.is_empty() {
        return Timeline::default();
    }
    spans.sort_by_key(|span| span.start_year);

    let min_year = spans.iter().map(|s| s.start_year).min().unwrap_or(current_year)
        - AXIS_PADDING_YEARS;
    let max_year = spans.iter().map(|s| s.end_year).max().unwrap_or(current_year)
        + AXIS_PADDING_YEARS;

    // End year of the last bar on each track
    let mut tracks: Vec<i32> = Vec::new();
    let mut items = Vec::with_capacity(spans.len());

    for span in &spans {
        let track = match tracks
            .iter()
            .position(|&end| end + config.track_gap <= span.start_year)
        {
            Some(track) => {
                tracks[track] = span.end_year;
                track
            }
            None => {
                tracks.push(span.end_year);
                tracks.len() - 1
            }
        };

        let width = (span.end_year - span.start_year) as f32 * config.pixels_per_year;
        items.push(TimelineItem {
            id: span.member.id,
            name: span.member.name.clone(),
            start_year: span.start_year,
            end_year: span.end_year,
            is_alive: span.is_alive,
            track,
            position: Point::new(
                (span.start_year - min_year) as f32 * config.pixels_per_year,
                track as f32 * config.row_height + config.header_height,
            ),
            width: width.max(config.pixels_per_year / 2.0),
        });
    }

    let first_marker = min_year.div_euclid(MARKER_STEP_YEARS) * MARKER_STEP_YEARS;
    let year_markers = (first_marker..=max_year)
        .step_by(MARKER_STEP_YEARS as usize)
        .map(|year| YearMarker {
            year,
            position: Point::new(
                (year - min_year) as f32 * config.pixels_per_year,
                MARKER_Y,
            ),
        })
        .collect();

    log::debug!(
        "timeline: {} bars on {} tracks, {min_year}..={max_year}",
        items.len(),
        tracks.len()
    );

    Timeline {
        items,
        year_markers,
        min_year,
        max_year,
        track_count: tracks.len(),
    }
}
