pub mod health;
pub use self::health::health;

pub mod session_ping;
pub use self::session_ping::ping;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;
