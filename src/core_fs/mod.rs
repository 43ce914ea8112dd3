pub mod listing;
pub mod probes;
pub mod sandbox;
