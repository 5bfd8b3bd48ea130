// handlers/mod.rs - HTTP handlers
//
// public: unauthenticated service endpoints (welcome, health)
// entity: CRUD endpoints shared by every entity kind, behind JWT auth

pub mod entity;
pub mod public;
