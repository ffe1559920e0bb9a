pub mod client;
pub mod token;
pub mod types;

pub use client::{AlertRecord, FirestoreClient, FirestoreError};
