//! HTTP client shared by the data API client

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
