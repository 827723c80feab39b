//! Sensors module - what the station reports and how it reads on a dial

pub mod observation;
pub mod wind;
