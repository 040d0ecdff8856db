pub mod calendar;
pub mod care;
pub mod care_guide;
pub mod database_validator;
pub mod identity;
pub mod recommendation;
pub mod watering;
