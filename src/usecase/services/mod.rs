pub mod compare_service;
pub mod export_service;
