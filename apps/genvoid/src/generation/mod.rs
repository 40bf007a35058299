// Generation: settings sessions, the request workflow and its presenter.
// All image-service calls go through imagen_client; nothing here speaks HTTP
// to the collaborator directly.

pub mod defaults;
pub mod handlers;
pub mod presenter;
pub mod session;
pub mod sessions;
pub mod status;
pub mod workflow;

#[cfg(test)]
pub mod testing;
