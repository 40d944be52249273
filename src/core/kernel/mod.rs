//! Transport and wire codec for the device API
//!
//! The kernel holds the parts of the client that know nothing about sessions:
//!
//! - `Transport`: sends one encoded request and returns the raw response.
//!   `ReqwestTransport` talks HTTP, `ScriptedTransport` replays canned
//!   responses for tests and offline runs.
//! - `codec`: fills catalog templates into requests and pulls fields and
//!   error codes out of XML response bodies.
//!
//! # Example
//!
//! ```rust
//! use huamodem::core::kernel::codec::{self, Substitutions};
//! use huamodem::modem::requests::DEVICE_INFO;
//!
//! let subs = Substitutions {
//!     session_id: Some("SessionID=abc"),
//!     ..Substitutions::default()
//! };
//! let request = codec::encode(&DEVICE_INFO, &subs).unwrap();
//! assert_eq!(request.header("Cookie"), Some("SessionID=abc"));
//!
//! let doc = codec::decode(b"<response><Imei>861234567890123</Imei></response>").unwrap();
//! assert_eq!(codec::extract_field(&doc, "Imei").as_deref(), Some("861234567890123"));
//! assert_eq!(codec::extract_error_code(&doc), None);
//! ```
pub mod codec;
pub mod scripted;
pub mod transport;

pub use codec::{LoginPayload, Substitutions};
pub use scripted::ScriptedTransport;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportConfig};
