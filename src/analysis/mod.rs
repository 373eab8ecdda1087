// Strategy simulation and aggregation
pub mod day_of_year;
pub mod monte_carlo;
pub mod simulator;
pub mod summary;

// Re-export commonly used types
pub use day_of_year::{DayOfYearScan, DayPoint};
pub use monte_carlo::{MonteCarloConfig, TrialResult};
pub use simulator::{Purchase, SimulationOutcome, simulate};
pub use summary::StrategySummary;
