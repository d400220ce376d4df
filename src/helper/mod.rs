pub mod angle;
pub mod error_reporting;
pub mod logger;
pub mod more_errors;
pub mod unique_id_gen;
