//! Spray Fleet Library
//!
//! Dispatch and motion simulation for a fleet of water-spray trucks, with
//! the AQI impact model and traffic alert deduplication that sit next to it.

pub mod simulation;
