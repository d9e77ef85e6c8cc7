//! Optimization entry point: distances, route order, then schedule.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coordinate::Coordinate;
use crate::error::OptimizeError;
use crate::fallback::FallbackSource;
use crate::haversine::HaversineSource;
use crate::matrix::MatrixSource;
use crate::route::{MatrixIndex, RouteBuilder};
use crate::schedule::{
    ClockTime, DEFAULT_MINUTES_PER_MILE, ScheduleGenerator, ScheduleLeg, travel_minutes,
};
use crate::traits::{DistanceSource, PairwiseDistanceProvider, Stop};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    /// Departure time from the origin (or arrival at the first stop).
    pub start_time: NaiveTime,
    /// Average speed proxy used for every leg.
    pub minutes_per_mile: f64,
    /// Close the loop back to the origin. Ignored without an origin.
    pub round_trip: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            minutes_per_mile: DEFAULT_MINUTES_PER_MILE,
            round_trip: true,
        }
    }
}

/// A stop in its optimized position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledStop<I> {
    pub id: I,
    /// Position of the stop in the caller's input list.
    pub input_index: usize,
    /// 1-based sequence position in the route.
    pub position: usize,
    pub arrival: ClockTime,
    pub departure: ClockTime,
    /// Distance from the previous position (origin or stop).
    pub travel_miles: f64,
    pub travel_minutes: u32,
    pub service_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult<I> {
    pub route: Vec<ScheduledStop<I>>,
    /// Departure from the origin; absent when the route starts at a stop.
    pub departure: Option<ClockTime>,
    pub total_distance_miles: f64,
    pub total_travel_minutes: u32,
    pub total_service_minutes: u32,
    pub return_time: Option<ClockTime>,
    pub return_leg_miles: Option<f64>,
    pub round_trip: bool,
    pub distance_source: MatrixSource,
}

/// Runs one optimization per call over an immutable snapshot of stops.
#[derive(Debug, Clone)]
pub struct Optimizer<D> {
    source: D,
}

impl Optimizer<HaversineSource> {
    /// Optimizer with no precision service configured.
    pub fn geometric() -> Self {
        Self::new(HaversineSource)
    }
}

impl<P: PairwiseDistanceProvider> Optimizer<FallbackSource<P>> {
    /// Optimizer backed by a precise provider with haversine fallback.
    pub fn with_provider(provider: P) -> Self {
        Self::new(FallbackSource::new(provider))
    }
}

impl<D: DistanceSource> Optimizer<D> {
    pub fn new(source: D) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// Order `stops` and schedule them.
    ///
    /// Uses the round-trip builder when an origin is given and
    /// `options.round_trip` is set, otherwise the open-path builder.
    pub fn optimize<S: Stop>(
        &self,
        stops: &[S],
        origin: Option<Coordinate>,
        options: &OptimizeOptions,
    ) -> Result<OptimizationResult<S::Id>, OptimizeError> {
        if stops.is_empty() {
            return Err(OptimizeError::EmptyInput);
        }
        let minutes_per_mile = options.minutes_per_mile;
        if !minutes_per_mile.is_finite() || minutes_per_mile <= 0.0 {
            return Err(OptimizeError::InvalidMinutesPerMile(minutes_per_mile));
        }

        let index = MatrixIndex::new(stops, origin.is_some())?;
        let coordinates: Vec<Coordinate> = origin
            .into_iter()
            .chain(stops.iter().map(S::location))
            .collect();
        let matrix = self.source.matrix(&coordinates, &coordinates);

        let builder = RouteBuilder::from_index(&matrix, &index);
        let round_trip = options.round_trip && origin.is_some();
        let route = if round_trip {
            builder.round_trip()
        } else {
            builder.nearest_neighbor()
        };

        let legs: Vec<ScheduleLeg> = route
            .order
            .iter()
            .enumerate()
            .map(|(step, &position)| ScheduleLeg {
                travel_miles: builder.leg_distance(&route.order, step),
                service_minutes: stops[position].service_duration_minutes(),
            })
            .collect();
        let return_leg_miles = if route.closed {
            builder.return_distance(&route.order)
        } else {
            None
        };

        let schedule = ScheduleGenerator::new(minutes_per_mile).generate(
            options.start_time,
            &legs,
            return_leg_miles,
        );

        let total_distance_miles = builder.distance(&route.order, route.closed);
        let total_service_minutes = legs
            .iter()
            .fold(0u32, |total, leg| total.saturating_add(leg.service_minutes));

        let scheduled = route
            .order
            .iter()
            .zip(&legs)
            .zip(&schedule.entries)
            .enumerate()
            .map(|(step, ((&position, leg), entry))| ScheduledStop {
                id: stops[position].id().clone(),
                input_index: position,
                position: step + 1,
                arrival: entry.arrival,
                departure: entry.departure,
                travel_miles: leg.travel_miles,
                travel_minutes: entry.travel_minutes,
                service_minutes: leg.service_minutes,
            })
            .collect();

        info!(
            stops = stops.len(),
            closed = route.closed,
            miles = total_distance_miles,
            source = ?matrix.source(),
            "route optimized"
        );

        Ok(OptimizationResult {
            route: scheduled,
            departure: origin.map(|_| ClockTime::new(options.start_time)),
            total_distance_miles,
            total_travel_minutes: travel_minutes(total_distance_miles, minutes_per_mile),
            total_service_minutes,
            return_time: schedule.return_time,
            return_leg_miles,
            round_trip: route.closed,
            distance_source: matrix.source(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Appointment {
        id: u32,
        location: Coordinate,
        minutes: u32,
    }

    impl Stop for Appointment {
        type Id = u32;

        fn id(&self) -> &Self::Id {
            &self.id
        }

        fn location(&self) -> Coordinate {
            self.location
        }

        fn service_duration_minutes(&self) -> u32 {
            self.minutes
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let stops: Vec<Appointment> = Vec::new();
        let result = Optimizer::geometric().optimize(&stops, None, &OptimizeOptions::default());
        assert_eq!(result.unwrap_err(), OptimizeError::EmptyInput);
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let stops = vec![Appointment {
            id: 1,
            location: Coordinate::new(0.0, 0.0),
            minutes: 10,
        }];
        let options = OptimizeOptions {
            minutes_per_mile: 0.0,
            ..OptimizeOptions::default()
        };
        assert!(matches!(
            Optimizer::geometric().optimize(&stops, None, &options),
            Err(OptimizeError::InvalidMinutesPerMile(_))
        ));
    }

    #[test]
    fn single_stop_round_trip_doubles_the_leg() {
        let stops = vec![Appointment {
            id: 7,
            location: Coordinate::new(0.0, 1.0),
            minutes: 30,
        }];
        let origin = Some(Coordinate::new(0.0, 0.0));
        let result = Optimizer::geometric()
            .optimize(&stops, origin, &OptimizeOptions::default())
            .unwrap();

        let leg = result.route[0].travel_miles;
        assert!((leg - 69.09).abs() < 0.05, "got {}", leg);
        assert!((result.total_distance_miles - 2.0 * leg).abs() < 1e-9);
        assert_eq!(result.return_leg_miles, Some(leg));
        assert_eq!(result.total_service_minutes, 30);
        assert_eq!(result.route[0].position, 1);
        // 69.1 mi * 3 = 208 min out, 30 on site, 208 back from 08:00.
        assert_eq!(result.route[0].arrival.to_string(), "11:28");
        assert_eq!(result.return_time.map(|t| t.to_string()).as_deref(), Some("15:26"));
    }

    #[test]
    fn huge_service_durations_saturate() {
        let stops = vec![
            Appointment {
                id: 1,
                location: Coordinate::new(0.0, 0.1),
                minutes: u32::MAX,
            },
            Appointment {
                id: 2,
                location: Coordinate::new(0.0, 0.2),
                minutes: 10,
            },
        ];
        let result = Optimizer::geometric()
            .optimize(&stops, Some(Coordinate::new(0.0, 0.0)), &OptimizeOptions::default())
            .unwrap();

        assert_eq!(result.total_service_minutes, u32::MAX);
        assert!(result.route[1].arrival > result.route[0].arrival);
        assert!(result.return_time.unwrap() > result.route[1].arrival);
    }

    #[test]
    fn open_path_has_no_return() {
        let stops = vec![
            Appointment {
                id: 1,
                location: Coordinate::new(0.0, 0.2),
                minutes: 10,
            },
            Appointment {
                id: 2,
                location: Coordinate::new(0.0, 0.1),
                minutes: 10,
            },
        ];
        let options = OptimizeOptions {
            round_trip: false,
            ..OptimizeOptions::default()
        };
        let result = Optimizer::geometric()
            .optimize(&stops, Some(Coordinate::new(0.0, 0.0)), &options)
            .unwrap();

        let ids: Vec<u32> = result.route.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(!result.round_trip);
        assert_eq!(result.return_time, None);
        assert_eq!(result.return_leg_miles, None);
    }
}
