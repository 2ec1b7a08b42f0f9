pub mod gateway;
pub mod messages;
pub mod phone;

pub use gateway::{SmsGateway, SmsSender};
