// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and the ad listing. The listing still reads an optional
// viewer identity so it can mark the viewer's own ads.

pub mod ads; // GET /api/v1/ads
pub mod auth; // POST /api/v1/register, POST /api/v1/login
