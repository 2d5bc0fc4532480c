//! In-memory collaborators for dispatch tests.

mod mock_lookup;
mod mock_transport;

#[allow(unused_imports)]
pub use mock_lookup::MockProviderLookup;
#[allow(unused_imports)]
pub use mock_transport::{MockHttpTransport, RecordedRequest};
