//! Variable-update payload and signed request assembly.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{sign, CadError};

/// Measured lens parameters to push, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensParameters {
    /// Measured bridge width.
    pub bridge_mm: f64,
    /// Extra width added to the bridge.
    pub offset_mm: f64,
    /// Lens length.
    pub lens_length_mm: f64,
    /// Lens width.
    pub lens_width_mm: f64,
}

impl LensParameters {
    /// Bridge width written to the model: measured bridge plus offset.
    #[must_use]
    pub fn bridge_width_mm(&self) -> f64 {
        self.bridge_mm + self.offset_mm
    }

    /// The three variable updates, in push order.
    #[must_use]
    pub fn variables(&self) -> Vec<VariableUpdate> {
        vec![
            VariableUpdate::length("BridgeWid", self.bridge_width_mm()),
            VariableUpdate::length("LensLen", self.lens_length_mm),
            VariableUpdate::length("LensWid", self.lens_width_mm),
        ]
    }
}

/// One variable assignment in the CAD document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableUpdate {
    /// Variable name in the document.
    pub variable_id: String,
    /// Unit-suffixed expression, e.g. `"25.03 mm"`.
    pub expression: String,
    /// Variable kind.
    pub variable_type: String,
}

impl VariableUpdate {
    /// A length variable expressed in millimeters.
    #[must_use]
    pub fn length(name: &str, value_mm: f64) -> Self {
        Self {
            variable_id: name.to_string(),
            expression: format!("{value_mm} mm"),
            variable_type: "Length".to_string(),
        }
    }
}

/// Request body of a variable update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariablesPayload {
    /// Variables to assign.
    pub variables: Vec<VariableUpdate>,
}

/// Document coordinates of the element whose variables are updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadTarget {
    /// Document ID.
    pub document_id: String,
    /// Workspace ID.
    pub workspace_id: String,
    /// Element (part studio) ID.
    pub element_id: String,
}

impl CadTarget {
    /// API path of the element's variables.
    #[must_use]
    pub fn path(&self) -> String {
        format!(
            "/api/variables/d/{}/w/{}/e/{}",
            self.document_id, self.workspace_id, self.element_id
        )
    }
}

/// API key pair.
#[derive(Clone)]
pub struct CadCredentials {
    /// Public access key.
    pub access_key: String,
    /// Secret key used for signing.
    pub secret_key: String,
}

impl fmt::Debug for CadCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CadCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// A fully signed request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: &'static str,
    /// Request path.
    pub path: String,
    /// Query string without the leading `?`; may be empty.
    pub query: String,
    /// Minified JSON body.
    pub body: String,
    /// Header values as `(name, value)` pairs.
    pub headers: Vec<(&'static str, String)>,
}

impl SignedRequest {
    /// Builds and signs a variable update.
    ///
    /// `timestamp_ms` and `nonce` are supplied by the caller so that signing
    /// stays deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized or the key is
    /// rejected.
    pub fn variable_update(
        credentials: &CadCredentials,
        target: &CadTarget,
        params: &LensParameters,
        timestamp_ms: u64,
        nonce: &str,
    ) -> Result<Self, CadError> {
        const METHOD: &str = "POST";

        let path = target.path();
        let query = String::new();
        let body = serde_json::to_string(&VariablesPayload {
            variables: params.variables(),
        })?;
        let timestamp = timestamp_ms.to_string();

        let signature = sign(
            &credentials.secret_key,
            &timestamp,
            nonce,
            METHOD,
            &path,
            &query,
            &body,
        )?;

        let headers = vec![
            ("Content-Type", "application/json".to_string()),
            ("On-Nonce", nonce.to_string()),
            ("On-Timestamp", timestamp),
            ("On-Access-Key", credentials.access_key.clone()),
            ("On-Signature", signature),
        ];

        Ok(Self {
            method: METHOD,
            path,
            query,
            body,
            headers,
        })
    }

    /// Value of the named header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LensParameters {
        LensParameters {
            bridge_mm: 20.03,
            offset_mm: 5.0,
            lens_length_mm: 2.587,
            lens_width_mm: 4.297,
        }
    }

    fn target() -> CadTarget {
        CadTarget {
            document_id: "doc123".into(),
            workspace_id: "ws456".into(),
            element_id: "el789".into(),
        }
    }

    fn credentials() -> CadCredentials {
        CadCredentials {
            access_key: "access".into(),
            secret_key: "test-secret".into(),
        }
    }

    #[test]
    fn test_bridge_includes_offset() {
        assert!((params().bridge_width_mm() - 25.03).abs() < 1e-9);
    }

    #[test]
    fn test_length_expression_format() {
        assert_eq!(VariableUpdate::length("LensLen", 25.0).expression, "25 mm");
        assert_eq!(VariableUpdate::length("LensLen", 25.5).expression, "25.5 mm");
        assert_eq!(VariableUpdate::length("LensLen", -1.25).expression, "-1.25 mm");
        assert_eq!(VariableUpdate::length("LensLen", 25.0).variable_type, "Length");
    }

    #[test]
    fn test_target_path() {
        assert_eq!(target().path(), "/api/variables/d/doc123/w/ws456/e/el789");
    }

    #[test]
    fn test_minified_body() {
        let request =
            SignedRequest::variable_update(&credentials(), &target(), &params(), 1, "n")
                .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(
            request.body,
            r#"{"variables":[{"variableId":"BridgeWid","expression":"25.03 mm","variableType":"Length"},{"variableId":"LensLen","expression":"2.587 mm","variableType":"Length"},{"variableId":"LensWid","expression":"4.297 mm","variableType":"Length"}]}"#
        );
    }

    #[test]
    fn test_signed_headers() {
        let request = SignedRequest::variable_update(
            &credentials(),
            &target(),
            &params(),
            1_700_000_000_000,
            "0f8fad5b-d9cb-469f-a165-70867728950e",
        )
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(request.method, "POST");
        assert_eq!(request.header("On-Timestamp"), Some("1700000000000"));
        assert_eq!(
            request.header("On-Nonce"),
            Some("0f8fad5b-d9cb-469f-a165-70867728950e")
        );
        assert_eq!(request.header("on-access-key"), Some("access"));
        assert_eq!(
            request.header("On-Signature"),
            Some("zYauvijyrJvSJCn8p1ml6WyDArrx5Zl7KLNlkM/2m+w=")
        );
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("access"));
        assert!(!debug.contains("test-secret"));
    }
}
