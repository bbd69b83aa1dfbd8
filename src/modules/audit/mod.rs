pub mod controller;
pub mod logger;
pub mod model;
pub mod router;
pub mod service;

pub use logger::AuditLogger;
pub use router::init_audit_router;
