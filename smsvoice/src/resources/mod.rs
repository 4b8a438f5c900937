pub mod phone_pool;
pub mod protect_configuration;

pub use phone_pool::PhonePoolResource;
pub use protect_configuration::ProtectConfigurationResource;
