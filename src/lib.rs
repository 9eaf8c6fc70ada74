// Library surface: the quiz core plus its collaborators. The terminal
// front end in main.rs builds on top of this.
pub mod config;
pub mod lesson;
pub mod quiz;
pub mod speech;
