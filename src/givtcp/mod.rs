mod client;
mod sample;

pub use client::Client;
pub use sample::SampleFetcher;
