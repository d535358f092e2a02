//! Database record structures.
//!
//! Each entity has a create request, an update request, and a response type. Repositories take
//! the requests and return the responses, whichever backend they are implemented on.

pub mod tickets;
pub mod users;
