pub mod controls_panel;
pub mod properties;
pub mod status_bar;
