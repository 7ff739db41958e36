pub mod activity_panel;
pub mod clone_controls;
pub mod input_area;
pub mod mode_tabs;
pub mod notice;
pub mod status_bar;
