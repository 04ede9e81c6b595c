pub mod aggregator_service;
