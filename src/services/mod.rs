// Generic persistence for every table-backed resource
pub mod crud;

// Bill calculation, generation and payment tracking
pub mod billing;
