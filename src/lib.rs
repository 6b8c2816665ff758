#![doc = "The `taskdeck` library crate."]
#![doc = ""]
#![doc = "Domain models, authentication and authorization, routing configuration, and"]
#![doc = "error handling for the TaskDeck API. Task permissions are deliberately split:"]
#![doc = "the assignee of a task updates and toggles it while its creator deletes it,"]
#![doc = "and administrators may do both. The main binary wires these pieces together"]
#![doc = "and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
