/// Unit tests for the analysis and aggregation rules through the public API
mod analysis_tests;
mod aggregation_tests;
