pub mod sign_in;
pub mod subscriptions;

pub use sign_in::SignIn;
pub use subscriptions::Subscriptions;
