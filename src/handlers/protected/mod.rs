// handlers/protected/mod.rs - Protected handlers (session token required)
//
// Routes here sit behind `require_auth`; handlers receive the caller as a
// typed `AuthUser` argument.

pub mod ads; // POST /api/v1/ads
