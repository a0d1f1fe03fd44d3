pub mod ip;

pub use ip::{click_metadata, forwarded_client_ip};
