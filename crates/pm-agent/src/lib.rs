pub mod agent;
pub mod errors;
pub mod models;
pub mod product;
pub mod prompt_template;
pub mod providers;
pub mod settings;
pub mod systems;
