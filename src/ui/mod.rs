pub mod app;
pub mod center_panel;
pub mod faces;
pub mod left_panel;
pub mod right_panel;
pub mod settings;
pub mod settings_io;
