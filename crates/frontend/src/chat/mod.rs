pub mod classifier;
pub mod model;
pub mod prefilled_prompt;
pub mod session;
pub mod transcript;
pub mod view;
pub mod view_model;
