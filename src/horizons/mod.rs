//! Access to the JPL Horizons VECTORS service: query construction, response
//! parsing, and the chunked fetch-and-stitch protocol.

pub mod chunked;
pub mod query;
pub mod vector_parser;

pub use chunked::{ChunkedFetcher, FetchedSeries};
pub use query::{HorizonsClient, RawResponse, Signature, VectorSource};
