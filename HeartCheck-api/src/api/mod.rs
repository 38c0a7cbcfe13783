pub mod handlers;
pub mod retention;
pub mod routes;
