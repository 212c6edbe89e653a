pub mod constants;
pub mod datasets;
pub mod env_state;
pub mod errors;
pub mod horizons;
pub mod series;
pub mod time;
pub mod time_grid;
