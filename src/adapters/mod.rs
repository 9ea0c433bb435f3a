pub mod api_errors;
pub mod midtrans;
pub mod realtime;
