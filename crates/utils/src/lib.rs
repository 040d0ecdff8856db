pub mod date;
pub mod response;
pub mod sentry;
