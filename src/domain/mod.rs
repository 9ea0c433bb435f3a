pub mod audit;
pub mod error;
pub mod gateway;
pub mod id;
pub mod money;
pub mod payment;
pub mod push;
pub mod store;
