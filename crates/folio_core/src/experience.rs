//! Experience timeline and years-of-experience aggregation
//!
//! Work periods are merged before counting so concurrent jobs are not counted
//! twice. Rounding happens in two stages: each merged segment is rounded up to
//! whole days, then the summed days are floored to whole years.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{FolioError, Result};

const MS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;
const PRESENT: &str = "Present";
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceCategory {
    Work,
    Education,
    Patent,
}

impl ExperienceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceCategory::Work => "Work",
            ExperienceCategory::Education => "Education",
            ExperienceCategory::Patent => "Patents",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: u64,
    pub title: String,
    pub company: String,
    /// `"Jan 2020 – Mar 2022"` or `"Jan 2020 – Present"`
    pub period: String,
    pub marker: String,
    pub category: ExperienceCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutCard {
    pub id: u64,
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Length in whole days, rounded up.
    pub fn days(&self) -> i64 {
        let ms = (self.end - self.start).num_milliseconds();
        (ms as f64 / MS_PER_DAY).ceil() as i64
    }
}

/// Parse `"<Mon> <YYYY> – <Mon> <YYYY>|Present"`. `now` stands in for
/// `Present`.
pub fn parse_period(period: &str, now: NaiveDateTime) -> Result<DateRange> {
    let (start, end) = [" – ", " - "]
        .iter()
        .find_map(|sep| period.split_once(sep))
        .ok_or_else(|| {
            FolioError::invalid_period(period, 0, period.len(), "missing \" – \" separator")
        })?;

    Ok(DateRange {
        start: parse_month_year(period, start, now)?,
        end: parse_month_year(period, end, now)?,
    })
}

fn offset_in(whole: &str, part: &str) -> usize {
    part.as_ptr() as usize - whole.as_ptr() as usize
}

fn parse_month_year(period: &str, part: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let trimmed = part.trim();
    if trimmed == PRESENT {
        return Ok(now);
    }

    let mut tokens = trimmed.split_whitespace();
    let (Some(month_token), Some(year_token), None) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(FolioError::invalid_period(
            period,
            offset_in(period, part),
            part.len(),
            "expected \"<Mon> <YYYY>\"",
        ));
    };

    let month = month_token
        .get(..3)
        .map(str::to_ascii_lowercase)
        .and_then(|prefix| MONTHS.iter().position(|m| *m == prefix))
        .ok_or_else(|| {
            FolioError::invalid_period(
                period,
                offset_in(period, month_token),
                month_token.len(),
                "unknown month",
            )
        })?;

    let year: i32 = year_token.parse().map_err(|_| {
        FolioError::invalid_period(
            period,
            offset_in(period, year_token),
            year_token.len(),
            "invalid year",
        )
    })?;

    NaiveDate::from_ymd_opt(year, month as u32 + 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            FolioError::invalid_period(
                period,
                offset_in(period, year_token),
                year_token.len(),
                "year out of range",
            )
        })
}

/// Merge overlapping or touching ranges. Input order does not matter.
pub fn merge_ranges(mut ranges: Vec<DateRange>) -> Vec<DateRange> {
    ranges.sort_by_key(|range| range.start);

    let mut merged: Vec<DateRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(current) if range.start <= current.end => {
                current.end = current.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Whole years of work experience as of `now`.
///
/// Only `work` entries count. Entries with an unparseable period are skipped.
pub fn experience_years_at(experiences: &[Experience], now: NaiveDateTime) -> u32 {
    let ranges: Vec<DateRange> = experiences
        .iter()
        .filter(|exp| exp.category == ExperienceCategory::Work)
        .filter_map(|exp| match parse_period(&exp.period, now) {
            Ok(range) => Some(range),
            Err(e) => {
                warn!("skipping experience {} ({}): {:?}", exp.id, exp.title, e);
                None
            }
        })
        .collect();

    // a period that ends before it starts counts as zero days
    let total_days: i64 = merge_ranges(ranges)
        .iter()
        .map(|range| range.days().max(0))
        .sum();
    (total_days / 365) as u32
}

/// Whole years of work experience as of the local wall clock.
pub fn experience_years(experiences: &[Experience]) -> u32 {
    experience_years_at(experiences, Local::now().naive_local())
}

/// Timeline entries grouped by category, work first.
pub fn group_by_category(
    experiences: &[Experience],
) -> BTreeMap<ExperienceCategory, Vec<&Experience>> {
    let mut groups: BTreeMap<ExperienceCategory, Vec<&Experience>> = BTreeMap::new();
    for exp in experiences {
        groups.entry(exp.category).or_default().push(exp);
    }
    groups
}
