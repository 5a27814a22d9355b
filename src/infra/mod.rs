//! Concrete record-store backends.

pub mod firestore;
