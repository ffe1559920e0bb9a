pub mod alerts;
pub mod app;
pub mod config;
pub mod email;
pub mod firestore;
pub mod state;
