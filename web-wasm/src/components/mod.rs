pub mod answer_panel;
pub mod capture_button;
pub mod header;
pub mod loading_indicator;
