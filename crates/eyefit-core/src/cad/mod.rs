//! CAD parameter push: payload building and request signing.
//!
//! The push updates three length variables in a parametric CAD document.
//! Requests are authenticated with an HMAC-SHA256 signature over
//! `timestamp + nonce + method + path + query + body`. Sending the request is
//! left to an adapter.

mod error;
mod request;
mod signing;

pub use error::CadError;
pub use request::{
    CadCredentials, CadTarget, LensParameters, SignedRequest, VariableUpdate, VariablesPayload,
};
pub use signing::sign;
