// handlers/auth/mod.rs - Session endpoints
//
// Login and status go to their backend delegates; logout is answered here,
// since all it does is drop the session cookie.

pub mod login; // POST /api/auth/login
pub mod logout; // POST /api/auth/logout
pub mod status; // GET /api/auth/status

pub use login::login_post;
pub use logout::logout_post;
pub use status::status_get;
