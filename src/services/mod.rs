pub mod avatar;
pub mod modal;
pub mod profile_client;
pub mod refresh_scheduler;
pub mod renderer;
pub mod surface;
pub mod view_model;
