use chrono::{Datelike, Timelike};
use std::collections::BTreeSet;
use tracing::warn;

/// Half-open hour-of-day range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    /// Parses `start-end`. Anything other than exactly two integer bounds yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let bounds: Vec<&str> = raw.split('-').map(str::trim).collect();
        match bounds.as_slice() {
            [start, end] => Some(Self::new(start.parse().ok()?, end.parse().ok()?)),
            _ => None,
        }
    }
}

/// Validated day/hour gate evaluated before every poll cycle.
///
/// Weekdays are numbered from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleWindow {
    days: Option<BTreeSet<u32>>,
    hours: Option<HourRange>,
}

impl ScheduleWindow {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn with_days(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.days = Some(days.into_iter().collect());
        self
    }

    pub fn with_hours(mut self, hours: HourRange) -> Self {
        self.hours = Some(hours);
        self
    }

    /// Builds a window from the raw `DAYS` / `HOURS` settings.
    ///
    /// Unparseable day entries are dropped and a list without any valid day
    /// never matches. A malformed hour range means "no restriction".
    pub fn parse(days: Option<&str>, hours: Option<&str>) -> Self {
        let mut window = Self::unrestricted();

        if let Some(raw) = days.map(str::trim).filter(|raw| !raw.is_empty()) {
            let mut parsed = BTreeSet::new();
            for entry in raw.split(',').map(str::trim) {
                match entry.parse::<u32>() {
                    Ok(day) if day <= 6 => {
                        parsed.insert(day);
                    }
                    _ => warn!("Ignoring invalid day-of-week entry '{}' in DAYS", entry),
                }
            }

            if parsed.is_empty() {
                warn!(
                    "DAYS '{}' contains no valid day (0 = Sunday .. 6 = Saturday, ISO 7 is not accepted), no cycle will run",
                    raw
                );
            }
            window.days = Some(parsed);
        }

        if let Some(raw) = hours.map(str::trim).filter(|raw| !raw.is_empty()) {
            match HourRange::parse(raw) {
                Some(range) => {
                    if range.start >= range.end {
                        warn!("HOURS '{}' is an empty range, no cycle will run", raw);
                    }
                    window.hours = Some(range);
                }
                None => warn!("Ignoring malformed HOURS '{}', expected 'start-end'", raw),
            }
        }

        window
    }

    pub fn days(&self) -> Option<&BTreeSet<u32>> {
        self.days.as_ref()
    }

    pub fn hours(&self) -> Option<HourRange> {
        self.hours
    }

    pub fn is_unrestricted(&self) -> bool {
        self.days.is_none() && self.hours.is_none()
    }

    pub fn should_run<T: Datelike + Timelike>(&self, now: &T) -> bool {
        should_run(now, self.days.as_ref(), self.hours)
    }
}

/// Decides whether a poll cycle may run at `now`.
pub fn should_run<T: Datelike + Timelike>(
    now: &T,
    day_allowlist: Option<&BTreeSet<u32>>,
    hour_range: Option<HourRange>,
) -> bool {
    if let Some(days) = day_allowlist {
        if !days.contains(&now.weekday().num_days_from_sunday()) {
            return false;
        }
    }

    if let Some(range) = hour_range {
        if !range.contains(now.hour()) {
            return false;
        }
    }

    true
}
