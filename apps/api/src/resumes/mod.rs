// Resume CRUD, draft/final lifecycle and AI scoring of stored resumes.

pub mod handlers;
pub mod store;
pub mod validation;
