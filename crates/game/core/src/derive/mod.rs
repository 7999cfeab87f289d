//! Derived-state calculators.
//!
//! Both calculators are pure: the runtime calls them after every mutation
//! that touches their inputs and stores the result wholesale.
pub mod character;
pub mod menu;

pub use character::{CharacterRecord, character_from_record, character_status_message, class_name};
pub use menu::{MenuInputs, calculate_menu_state};
