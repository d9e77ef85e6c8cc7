//! Wall-clock schedule for an ordered route.
//!
//! Times are minute-granular. Travel time for a leg is
//! `ceil(miles * minutes_per_mile)`, so arrivals are never under-promised.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::error::OptimizeError;

/// Default speed proxy: 3 minutes per mile, i.e. 20 mph.
pub const DEFAULT_MINUTES_PER_MILE: f64 = 3.0;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Parse a `"HH:MM"` wall-clock time.
pub fn parse_clock(value: &str) -> Result<NaiveTime, OptimizeError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| OptimizeError::InvalidStartTime(value.to_string()))
}

/// Minutes needed to drive `miles`, rounded up.
pub fn travel_minutes(miles: f64, minutes_per_mile: f64) -> u32 {
    let minutes = (miles * minutes_per_mile).ceil();
    if minutes.is_finite() && minutes > 0.0 {
        minutes as u32
    } else {
        0
    }
}

/// A time of day plus the number of midnights crossed since the start.
///
/// Ordering compares the day offset first, so a schedule that runs past
/// midnight stays non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub day_offset: u32,
    pub time: NaiveTime,
}

impl ClockTime {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            day_offset: 0,
            time,
        }
    }

    pub fn add_minutes(self, minutes: u32) -> Self {
        let seconds = u64::from(self.time.num_seconds_from_midnight()) + u64::from(minutes) * 60;
        let days = u32::try_from(seconds / SECONDS_PER_DAY).unwrap_or(u32::MAX);
        let remainder = (seconds % SECONDS_PER_DAY) as u32;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(remainder, 0).unwrap_or_default();

        Self {
            day_offset: self.day_offset.saturating_add(days),
            time,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M"))?;
        if self.day_offset > 0 {
            write!(f, "+{}d", self.day_offset)?;
        }
        Ok(())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One stop as seen by the schedule: how far it is from the previous
/// position and how long the visit takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleLeg {
    pub travel_miles: f64,
    pub service_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub arrival: ClockTime,
    pub departure: ClockTime,
    pub travel_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub return_time: Option<ClockTime>,
    pub return_travel_minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleGenerator {
    minutes_per_mile: f64,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self {
            minutes_per_mile: DEFAULT_MINUTES_PER_MILE,
        }
    }
}

impl ScheduleGenerator {
    pub fn new(minutes_per_mile: f64) -> Self {
        Self { minutes_per_mile }
    }

    /// Walk `legs` in order from `start`.
    ///
    /// The first leg's `travel_miles` is the distance from the origin (zero
    /// without one). `return_miles`, when given, is driven after the last
    /// stop's service time and recorded as the return time.
    pub fn generate(
        &self,
        start: NaiveTime,
        legs: &[ScheduleLeg],
        return_miles: Option<f64>,
    ) -> Schedule {
        let mut clock = ClockTime::new(start);
        let mut entries = Vec::with_capacity(legs.len());

        for leg in legs {
            let travel = travel_minutes(leg.travel_miles, self.minutes_per_mile);
            let arrival = clock.add_minutes(travel);
            let departure = arrival.add_minutes(leg.service_minutes);
            entries.push(ScheduleEntry {
                arrival,
                departure,
                travel_minutes: travel,
            });
            clock = departure;
        }

        let (return_time, return_travel_minutes) = match return_miles {
            Some(miles) if !legs.is_empty() => {
                let travel = travel_minutes(miles, self.minutes_per_mile);
                (Some(clock.add_minutes(travel)), Some(travel))
            }
            _ => (None, None),
        };

        Schedule {
            entries,
            return_time,
            return_travel_minutes,
        }
    }
}
