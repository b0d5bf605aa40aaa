pub mod registration;

pub use registration::{DeviceInfo, RegistrationClient};
