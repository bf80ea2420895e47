pub mod email;
pub mod events;
pub mod notifiers;
pub mod repositories;
