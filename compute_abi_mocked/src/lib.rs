pub mod mock_host;

pub use mock_host::{MockHost, IO_INTERRUPT, MAX_KEY_LEN, MAX_STORE_NAME_LEN, WANT_ERROR};
