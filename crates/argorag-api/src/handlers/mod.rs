mod chat;
mod health;
mod profiles;

pub use chat::submit_question;
pub use health::health_check;
pub use profiles::get_depth_series;
