pub mod face_picker;
pub mod handlers;
pub mod header;
pub mod mode_tabs;
pub mod results;
pub mod theme_toggle;
pub mod upload_section;
pub mod utils;
