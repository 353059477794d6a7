use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::CoreError;

/// How far past today `add_date` scans before giving up on finding an
/// unused column.
const DATE_LOOKAHEAD_DAYS: i64 = 14;

/// One roster row on a team's attendance sheet. Row ids are generated
/// locally; they are sheet-scoped, not identity-provider ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub level: String,
}

/// Team-scoped athlete×date presence matrix.
///
/// Structural invariants, preserved by every edit operation:
/// - every (athlete, date) pair in the lists has a defined entry in
///   `records` (newly created pairs default to `false`);
/// - date keys are unique within the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSheet {
    pub team: String,
    pub dates: Vec<String>,
    pub athletes: Vec<AthleteRow>,
    pub records: HashMap<String, HashMap<String, bool>>,
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl AttendanceSheet {
    /// Empty sheet, as created lazily on a team's first load.
    pub fn new(team: &str) -> Self {
        Self {
            team: team.to_string(),
            dates: Vec::new(),
            athletes: Vec::new(),
            records: HashMap::new(),
        }
    }

    /// Appends the next unused date, scanning forward from `today` with a
    /// bounded lookahead, and backfills `false` for every athlete. Falls
    /// back to today's key when the whole window is taken; since that key
    /// already exists, the fallback leaves the sheet unchanged.
    pub fn add_date(&mut self, today: NaiveDate) -> String {
        for offset in 0..=DATE_LOOKAHEAD_DAYS {
            let key = date_key(today + Duration::days(offset));
            if !self.dates.iter().any(|d| *d == key) {
                self.dates.push(key.clone());
                for athlete in &self.athletes {
                    self.records
                        .entry(athlete.id.clone())
                        .or_default()
                        .insert(key.clone(), false);
                }
                return key;
            }
        }
        date_key(today)
    }

    /// Removes the date column and every athlete's entry for it.
    pub fn remove_date(&mut self, date: &str) {
        self.dates.retain(|d| d != date);
        for marks in self.records.values_mut() {
            marks.remove(date);
        }
    }

    /// Moves every athlete's mark from `old` to `new`, keeping the
    /// column's position. Athletes without an `old` entry get `false`
    /// under `new`.
    pub fn rename_date(&mut self, old: &str, new: &str) -> Result<(), CoreError> {
        if old == new {
            return Ok(());
        }
        if self.dates.iter().any(|d| d == new) {
            return Err(CoreError::DuplicateDate(new.to_string()));
        }
        let Some(position) = self.dates.iter().position(|d| d == old) else {
            return Ok(());
        };
        self.dates[position] = new.to_string();
        for athlete in &self.athletes {
            let marks = self.records.entry(athlete.id.clone()).or_default();
            let mark = marks.remove(old).unwrap_or(false);
            marks.insert(new.to_string(), mark);
        }
        Ok(())
    }

    /// Flips the presence flag at (athlete, date).
    pub fn toggle(&mut self, athlete_id: &str, date: &str) {
        let mark = self
            .records
            .entry(athlete_id.to_string())
            .or_default()
            .entry(date.to_string())
            .or_insert(false);
        *mark = !*mark;
    }

    /// Appends a roster row with a fresh id and a `false` entry for every
    /// existing date. Returns the new row's id.
    pub fn add_athlete(&mut self, first_name: &str, last_name: &str, level: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.athletes.push(AthleteRow {
            id: id.clone(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            level: level.to_string(),
        });
        let marks = self
            .dates
            .iter()
            .map(|date| (date.clone(), false))
            .collect();
        self.records.insert(id.clone(), marks);
        id
    }

    /// Removes the roster row and its entire record map.
    pub fn remove_athlete(&mut self, athlete_id: &str) {
        self.athletes.retain(|a| a.id != athlete_id);
        self.records.remove(athlete_id);
    }

    pub fn is_marked(&self, athlete_id: &str, date: &str) -> bool {
        self.records
            .get(athlete_id)
            .and_then(|marks| marks.get(date))
            .copied()
            .unwrap_or(false)
    }

    /// Whether the matrix is structurally sound: unique dates, a record
    /// entry for every (athlete, date) pair, and no entries outside the
    /// athlete and date lists.
    pub fn is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        if !self.dates.iter().all(|d| seen.insert(d)) {
            return false;
        }
        for athlete in &self.athletes {
            let Some(marks) = self.records.get(&athlete.id) else {
                return false;
            };
            if marks.len() != self.dates.len() {
                return false;
            }
            if !self.dates.iter().all(|d| marks.contains_key(d)) {
                return false;
            }
        }
        self.records
            .keys()
            .all(|id| self.athletes.iter().any(|a| a.id == *id))
    }
}
