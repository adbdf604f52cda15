pub mod alloc;
pub mod insights;
pub mod record;
pub mod setup;
pub mod summary;
pub mod ui;
