//! Aggregate counts for the statistics dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::{FamilyMember, Gender};
use crate::numerals::generation_label;

/// Label for members without a recorded gender.
pub const UNKNOWN_GENDER: &str = "未知";
pub const ALIVE: &str = "在世";
pub const DECEASED: &str = "已故";

/// Age buckets: label and inclusive upper bound (None = open-ended).
const AGE_BUCKETS: [(&str, Option<i32>); 5] = [
    ("0-20", Some(20)),
    ("21-40", Some(40)),
    ("41-60", Some(60)),
    ("61-80", Some(80)),
    ("80+", None),
];

/// A labelled count, shaped for chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub name: String,
    pub value: usize,
}

impl StatEntry {
    fn new(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationCount {
    pub generation: i32,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    /// 男, 女, 未知; zero counts omitted.
    pub gender: Vec<StatEntry>,
    /// 在世, 已故; zero counts omitted.
    pub status: Vec<StatEntry>,
    /// Ascending by generation.
    pub generations: Vec<GenerationCount>,
    /// Every bucket in fixed order, zero counts included.
    pub ages: Vec<StatEntry>,
}

impl Statistics {
    pub fn count_of(entries: &[StatEntry], name: &str) -> usize {
        entries
            .iter()
            .find(|entry| entry.name == name)
            .map_or(0, |entry| entry.value)
    }

    /// Members that fell into an age bucket.
    pub fn aged_total(&self) -> usize {
        self.ages.iter().map(|entry| entry.value).sum()
    }
}

/// Current age of a living member. The deceased are not bucketed.
fn age_of(member: &FamilyMember, current_year: i32) -> Option<i32> {
    if !member.is_alive {
        return None;
    }
    let born = member.birth_year()?;
    Some(current_year - born).filter(|&age| age >= 0)
}

fn bucket_of(age: i32) -> usize {
    AGE_BUCKETS
        .iter()
        .position(|(_, upper)| upper.is_none_or(|upper| age <= upper))
        .unwrap_or(AGE_BUCKETS.len() - 1)
}

pub fn compute_statistics(members: &[FamilyMember], current_year: i32) -> Statistics {
    let mut male = 0;
    let mut female = 0;
    let mut unknown = 0;
    let mut alive = 0;
    let mut generations: BTreeMap<i32, usize> = BTreeMap::new();
    let mut ages = [0usize; AGE_BUCKETS.len()];

    for member in members {
        match member.gender {
            Some(Gender::Male) => male += 1,
            Some(Gender::Female) => female += 1,
            None => unknown += 1,
        }
        if member.is_alive {
            alive += 1;
        }
        if let Some(generation) = member.generation {
            *generations.entry(generation).or_default() += 1;
        }
        if let Some(age) = age_of(member, current_year) {
            ages[bucket_of(age)] += 1;
        }
    }

    let gender = [
        (Gender::Male.label(), male),
        (Gender::Female.label(), female),
        (UNKNOWN_GENDER, unknown),
    ]
    .into_iter()
    .filter(|&(_, count)| count > 0)
    .map(|(name, count)| StatEntry::new(name, count))
    .collect();
    let status = [(ALIVE, alive), (DECEASED, members.len() - alive)]
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .map(|(name, count)| StatEntry::new(name, count))
        .collect();

    Statistics {
        total: members.len(),
        gender,
        status,
        generations: generations
            .into_iter()
            .map(|(generation, count)| GenerationCount {
                generation,
                label: generation_label(generation),
                count,
            })
            .collect(),
        ages: AGE_BUCKETS
            .iter()
            .zip(ages)
            .map(|((label, _), count)| StatEntry::new(*label, count))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn member(id: u32, gender: Option<Gender>, born: Option<i32>, died: Option<i32>) -> FamilyMember {
        let mut m = FamilyMember::new(id, format!("m{id}"));
        m.gender = gender;
        m.birthday = born.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
        m.death_date = died.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
        m.is_alive = died.is_none();
        m
    }

    #[test]
    fn test_gender_and_status() {
        let members = vec![
            member(1, Some(Gender::Male), None, Some(1950)),
            member(2, Some(Gender::Male), None, None),
            member(3, Some(Gender::Female), None, None),
            member(4, None, None, None),
        ];
        let stats = compute_statistics(&members, 2024);

        assert_eq!(stats.total, 4);
        assert_eq!(Statistics::count_of(&stats.gender, "男"), 2);
        assert_eq!(Statistics::count_of(&stats.gender, "女"), 1);
        assert_eq!(Statistics::count_of(&stats.gender, UNKNOWN_GENDER), 1);
        assert_eq!(Statistics::count_of(&stats.status, ALIVE), 3);
        assert_eq!(Statistics::count_of(&stats.status, DECEASED), 1);
    }

    #[test]
    fn test_generations_ascending() {
        let members = vec![
            FamilyMember::new(1, "a").with_generation(3),
            FamilyMember::new(2, "b").with_generation(1),
            FamilyMember::new(3, "c").with_generation(3),
            FamilyMember::new(4, "d"),
        ];
        let stats = compute_statistics(&members, 2024);

        let counts: Vec<(i32, usize)> =
            stats.generations.iter().map(|g| (g.generation, g.count)).collect();
        assert_eq!(counts, vec![(1, 1), (3, 2)]);
        assert_eq!(stats.generations[1].label, "第三世");
    }

    #[test]
    fn test_age_buckets() {
        let members = vec![
            member(1, None, Some(2010), None),       // 14
            member(2, None, Some(2004), None),       // 20
            member(3, None, Some(2003), None),       // 21
            member(4, None, Some(1944), None),       // 80
            member(5, None, Some(1943), None),       // 81
            member(6, None, Some(2030), None),       // negative, skipped
            member(7, None, None, None),
            member(8, None, Some(1990), Some(2000)), // deceased
        ];
        let stats = compute_statistics(&members, 2024);

        let counts: Vec<(&str, usize)> =
            stats.ages.iter().map(|e| (e.name.as_str(), e.value)).collect();
        assert_eq!(
            counts,
            vec![("0-20", 2), ("21-40", 1), ("41-60", 0), ("61-80", 1), ("80+", 1)]
        );
        assert_eq!(stats.aged_total(), 5);
    }

    #[test]
    fn test_deceased_members_have_no_age() {
        let stats = compute_statistics(&[member(1, None, Some(1900), Some(1970))], 2024);
        assert_eq!(stats.aged_total(), 0);
        assert_eq!(Statistics::count_of(&stats.status, DECEASED), 1);

        // A death date alone does not make a member deceased
        let mut living = member(2, None, Some(1900), Some(1970));
        living.is_alive = true;
        let stats = compute_statistics(&[living], 2024);
        assert_eq!(Statistics::count_of(&stats.ages, "80+"), 1);
    }

    #[test]
    fn test_empty() {
        let stats = compute_statistics(&[], 2024);
        assert_eq!(stats.total, 0);
        assert!(stats.gender.is_empty());
        assert_eq!(stats.ages.len(), 5);
        assert_eq!(stats.aged_total(), 0);
    }
}
