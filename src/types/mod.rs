//! Type definitions for the Ragcy API.
//!
//! Request bodies for corpus operations and the response envelope shared by
//! every endpoint.

pub mod corpus;
pub mod envelope;
