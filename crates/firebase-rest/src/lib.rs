//! Minimal REST clients for Firebase services
//!
//! Covers the two capabilities the admin portal needs: Identity Toolkit
//! password sign-in and Firestore document queries and updates. All network
//! traffic goes through the [`http::HttpClient`] abstraction so callers can
//! substitute a fake in tests.

pub mod auth;
pub mod error;
pub mod firestore;
pub mod http;

pub use error::{FirebaseError, Result};
