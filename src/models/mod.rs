pub mod booking;
pub mod capster;
pub mod category;
pub mod payment_method;
pub mod request;
pub mod service;
pub mod template;
pub mod user;
