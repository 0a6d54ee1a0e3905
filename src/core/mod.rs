pub mod capture;
pub mod comparator;
pub mod services;
pub mod types;
