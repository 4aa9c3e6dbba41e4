pub mod compute;
pub mod params;
