pub mod date_format;
pub mod leave_request;
