pub mod animal_card;
pub mod animal_form_modal;
pub mod header;
pub mod loading_screen;
pub mod login_form;
