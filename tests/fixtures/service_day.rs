//! A realistic day of appointments around Henderson / southeast Las Vegas.
//!
//! Coordinates are street-level points taken from OpenStreetMap and route in
//! the OSRM Nevada extract.

use super::TestStop;

/// The technician's home base.
pub const HOME: (f64, f64) = (36.0395, -115.0501);

/// (id, lat, lng, minutes on site)
pub const APPOINTMENTS: &[(&str, f64, f64, u32)] = &[
    ("anthem-water-heater", 35.9916, -115.1028, 60),
    ("green-valley-ac", 36.0308, -115.0825, 45),
    ("sunset-station-panel", 36.0614, -115.0631, 30),
    ("lake-las-vegas-leak", 36.1095, -114.9276, 90),
    ("boulder-hwy-furnace", 36.0335, -114.9856, 40),
    ("seven-hills-inspection", 35.9949, -115.1000, 20),
    ("paradise-thermostat", 36.0728, -115.1003, 25),
    ("whitney-ranch-filter", 36.0432, -114.9978, 15),
    ("east-tropicana-duct", 36.0990, -115.0595, 50),
];

pub fn stops() -> Vec<TestStop> {
    APPOINTMENTS
        .iter()
        .map(|&(id, lat, lng, minutes)| TestStop::new(id).location(lat, lng).duration(minutes))
        .collect()
}
