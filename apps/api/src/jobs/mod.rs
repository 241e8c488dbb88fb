// Job API: list/create/update/delete over the Job Store.
// Handlers stay thin; every read-modify-write goes through JobService.

pub mod handlers;
pub mod service;

pub use service::JobService;
