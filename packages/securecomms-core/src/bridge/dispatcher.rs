//! # Bridge Dispatcher
//!
//! JSON-RPC style entry point that routes method names to [`Bridge`] calls.
//!
//! Returns `Ok(json_string)` on success, `Err((error_code, message))` on failure.
//! Every success payload is a tagged [`Response`].

use serde::de::DeserializeOwned;

use super::types::{Request, Response};
use super::Bridge;
use crate::derivation::SigningAuthority;
use crate::error::Error;

/// Dispatcher result: JSON on success, `(code, message)` on failure
pub type DResult = Result<String, (i32, String)>;

// ============================================================================
// HELPERS
// ============================================================================

fn err(e: Error) -> (i32, String) {
    (e.code(), e.to_string())
}

fn json_parse<T: DeserializeOwned>(args: &str) -> Result<T, (i32, String)> {
    serde_json::from_str(args)
        .map_err(|e| err(Error::InvalidRequest(format!("Invalid JSON: {}", e))))
}

fn ok_response(response: &Response) -> DResult {
    serde_json::to_string(response).map_err(|e| err(e.into()))
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Route a method call to the bridge
pub async fn dispatch<S: SigningAuthority>(
    bridge: &Bridge<S>,
    method: &str,
    args: &str,
) -> DResult {
    let request = match method {
        "comms_generate_keypair" => Request::GenerateKeypair(json_parse(args)?),
        "comms_encrypt" => Request::Encrypt(json_parse(args)?),
        "comms_decrypt" => Request::Decrypt(json_parse(args)?),
        "comms_forget_keypair" => Request::ForgetKeypair,
        "comms_request" => json_parse(args)?,
        _ => {
            tracing::warn!("Unknown dispatch method: {}", method);
            return Err(err(Error::UnknownMethod(method.to_string())));
        }
    };

    let response = bridge.handle(request).await.map_err(err)?;
    ok_response(&response)
}

// ============================================================================
// TESTS
// ============================================================================
