//! Mock implementations for handler and delivery tests
//!
//! The mock extractor never touches the network: it writes a file of the
//! requested size into a temporary directory, or fails with a fixed message.

pub mod mock_extractor;

pub use mock_extractor::{MockExtractor, MockOutcome};
