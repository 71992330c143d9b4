// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login; // POST /api/v1/login - check credentials and get a session token
pub mod register; // POST /api/v1/register - create a new account

pub use login::login;
pub use register::register;
