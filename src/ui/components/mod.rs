pub mod help;
pub mod path_prompt;
pub mod progress_bar;
pub mod results;
pub mod typing_indicator;
pub mod version_panel;
