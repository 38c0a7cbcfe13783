// HeartCheck-api lib.rs
//
// HTTP layer for HeartCheck: form and JSON parsing, handlers, routes and
// the OpenAPI document.

pub mod api;
pub mod entities;
pub mod openapi;
