pub mod use_animals;
pub mod use_app_store;
pub mod use_session;
