/// Data layer: lap-time parsing, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read cells → trim → resolve columns
///   └──────────┘
///        │  laptime::parse_lap_time on the time column
///        ▼
///   ┌──────────────┐
///   │ VehicleTable  │  Vec<VehicleRecord>, filter choices
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  brand / drivetrain / engine / search → indices
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod laptime;
pub mod loader;
pub mod model;
