pub mod aggregator;
pub mod azimuth;
pub mod normalizer;
pub mod report_service;
