//! Weekly availability grid for tutors
//!
//! A 7-day by hourly grid built from date arithmetic. Toggled cells are
//! kept as a draft under `tutor_availability_v2` until the tutor submits
//! them to the backend.

use super::app_state::AvailabilitySlot;
use crate::wizard::{Draft, DraftStore, AVAILABILITY_DRAFT_KEY};
use chrono::{Datelike, Duration, NaiveDate};
use serde_json::Value;
use std::collections::BTreeSet;

/// First bookable hour of the day
pub const GRID_START_HOUR: u32 = 7;
/// One past the last bookable hour
pub const GRID_END_HOUR: u32 = 22;

/// Monday of the week containing `date`
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn encode_slot(slot: &AvailabilitySlot) -> String {
    format!("{}T{:02}", slot.date.format("%Y-%m-%d"), slot.hour)
}

fn parse_slot(encoded: &str) -> Option<AvailabilitySlot> {
    let (date, hour) = encoded.split_once('T')?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let hour: u32 = hour.parse().ok()?;
    if !(GRID_START_HOUR..GRID_END_HOUR).contains(&hour) {
        return None;
    }
    Some(AvailabilitySlot { date, hour })
}

/// Cursor-navigable weekly grid of selected teaching hours
#[derive(Debug, Clone)]
pub struct AvailabilityGrid {
    week_start: NaiveDate,
    cursor_day: usize,
    cursor_row: usize,
    selected: BTreeSet<AvailabilitySlot>,
    hydrated: bool,
}

impl Default for AvailabilityGrid {
    fn default() -> Self {
        Self::new(chrono::Utc::now().date_naive())
    }
}

impl AvailabilityGrid {
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            week_start: week_start_of(anchor),
            cursor_day: 0,
            cursor_row: 0,
            selected: BTreeSet::new(),
            hydrated: false,
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// The seven days of the visible week, Monday first
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7)
            .map(|d| self.week_start + Duration::days(d))
            .collect()
    }

    pub fn hours(&self) -> std::ops::Range<u32> {
        GRID_START_HOUR..GRID_END_HOUR
    }

    pub fn next_week(&mut self) {
        self.week_start += Duration::days(7);
    }

    pub fn prev_week(&mut self) {
        self.week_start -= Duration::days(7);
    }

    /// Move the cursor, clamped to the grid
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let days = 7i32;
        let rows = (GRID_END_HOUR - GRID_START_HOUR) as i32;
        self.cursor_day = (self.cursor_day as i32 + dx).clamp(0, days - 1) as usize;
        self.cursor_row = (self.cursor_row as i32 + dy).clamp(0, rows - 1) as usize;
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_day, self.cursor_row)
    }

    /// The slot under the cursor
    pub fn cursor_slot(&self) -> AvailabilitySlot {
        AvailabilitySlot {
            date: self.week_start + Duration::days(self.cursor_day as i64),
            hour: GRID_START_HOUR + self.cursor_row as u32,
        }
    }

    pub fn is_selected(&self, slot: &AvailabilitySlot) -> bool {
        self.selected.contains(slot)
    }

    pub fn selected_slots(&self) -> Vec<AvailabilitySlot> {
        self.selected.iter().copied().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Toggle the slot under the cursor and persist the draft
    pub fn toggle_cursor(&mut self, store: &DraftStore) {
        let slot = self.cursor_slot();
        if !self.selected.remove(&slot) {
            self.selected.insert(slot);
        }
        self.persist(store);
    }

    /// Load previously drafted slots, once. Malformed entries are
    /// dropped rather than rejected wholesale.
    pub fn hydrate(&mut self, store: &DraftStore) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;
        let Some(draft) = store.load(AVAILABILITY_DRAFT_KEY) else {
            return;
        };
        if let Some(Value::Array(items)) = draft.form_snapshot.get("slots") {
            self.selected = items
                .iter()
                .filter_map(|v| v.as_str())
                .filter_map(parse_slot)
                .collect();
        }
    }

    fn persist(&self, store: &DraftStore) {
        let slots: Vec<Value> = self
            .selected
            .iter()
            .map(|s| Value::String(encode_slot(s)))
            .collect();
        let mut snapshot = std::collections::BTreeMap::new();
        snapshot.insert("slots".to_string(), Value::Array(slots));
        store.save(AVAILABILITY_DRAFT_KEY, &Draft::new(0, false, snapshot));
    }

    /// Called after the backend accepted the slots
    pub fn clear_draft(&self, store: &DraftStore) {
        store.clear(AVAILABILITY_DRAFT_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, DraftStore) {
        let dir = TempDir::new().unwrap();
        let store = DraftStore::with_dir(dir.path().to_path_buf());
        (dir, store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2026-03-10 is a Tuesday
        assert_eq!(week_start_of(date(2026, 3, 10)), date(2026, 3, 9));
        // A Monday maps to itself
        assert_eq!(week_start_of(date(2026, 3, 9)), date(2026, 3, 9));
        // A Sunday maps back six days
        assert_eq!(week_start_of(date(2026, 3, 15)), date(2026, 3, 9));
    }

    #[test]
    fn test_days_span_the_week() {
        let grid = AvailabilityGrid::new(date(2026, 3, 10));
        let days = grid.days();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2026, 3, 9));
        assert_eq!(days[6], date(2026, 3, 15));
    }

    #[test]
    fn test_week_navigation() {
        let mut grid = AvailabilityGrid::new(date(2026, 3, 10));
        grid.next_week();
        assert_eq!(grid.week_start(), date(2026, 3, 16));
        grid.prev_week();
        grid.prev_week();
        assert_eq!(grid.week_start(), date(2026, 3, 2));
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut grid = AvailabilityGrid::new(date(2026, 3, 10));
        grid.move_cursor(-3, -3);
        assert_eq!(grid.cursor(), (0, 0));
        grid.move_cursor(100, 100);
        assert_eq!(
            grid.cursor(),
            (6, (GRID_END_HOUR - GRID_START_HOUR - 1) as usize)
        );
    }

    #[test]
    fn test_toggle_and_round_trip_through_store() {
        let (_dir, store) = test_store();
        let mut grid = AvailabilityGrid::new(date(2026, 3, 10));
        grid.hydrate(&store);
        grid.move_cursor(1, 2);
        grid.toggle_cursor(&store);
        let slot = grid.cursor_slot();
        assert!(grid.is_selected(&slot));
        assert_eq!(slot.date, date(2026, 3, 10));
        assert_eq!(slot.hour, GRID_START_HOUR + 2);

        // A fresh grid hydrates the same selection back
        let mut reloaded = AvailabilityGrid::new(date(2026, 3, 10));
        reloaded.hydrate(&store);
        assert!(reloaded.is_selected(&slot));
        assert_eq!(reloaded.selected_count(), 1);

        // Toggling off persists the removal
        grid.toggle_cursor(&store);
        let mut again = AvailabilityGrid::new(date(2026, 3, 10));
        again.hydrate(&store);
        assert_eq!(again.selected_count(), 0);
    }

    #[test]
    fn test_malformed_slot_entries_are_dropped() {
        let (_dir, store) = test_store();
        let mut snapshot = std::collections::BTreeMap::new();
        snapshot.insert(
            "slots".to_string(),
            serde_json::json!(["2026-03-10T09", "garbage", "2026-03-10T23", 42]),
        );
        store.save(AVAILABILITY_DRAFT_KEY, &Draft::new(0, false, snapshot));

        let mut grid = AvailabilityGrid::new(date(2026, 3, 10));
        grid.hydrate(&store);
        // Only the in-range, well-formed slot survives
        assert_eq!(grid.selected_count(), 1);
        assert!(grid.is_selected(&AvailabilitySlot {
            date: date(2026, 3, 10),
            hour: 9
        }));
    }

    #[test]
    fn test_slot_codec() {
        let slot = AvailabilitySlot {
            date: date(2026, 3, 9),
            hour: 7,
        };
        assert_eq!(encode_slot(&slot), "2026-03-09T07");
        assert_eq!(parse_slot("2026-03-09T07"), Some(slot));
        assert_eq!(parse_slot("2026-03-09"), None);
        assert_eq!(parse_slot("2026-03-09T99"), None);
    }
}
