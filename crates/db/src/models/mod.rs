pub mod ai_recommendation;
pub mod care_log;
pub mod plant;
pub mod reminder;
pub mod user;
