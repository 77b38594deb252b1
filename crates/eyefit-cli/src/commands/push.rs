//! Push command - write lens parameters into the CAD document.

use anyhow::Result;
use clap::Args;
use eyefit_adapters::cad::{CadClient, DEFAULT_BASE_URL};
use eyefit_core::{CadCredentials, CadError, CadTarget, LensParameters};
use tracing::info;

use super::ExitCode;
use crate::config::{AppConfig, CadSection};

/// Arguments for the CAD push.
#[derive(Args, Clone, Debug)]
pub struct PushArgs {
    /// Measured bridge width in millimeters
    #[arg(long, value_name = "MM")]
    pub bridge: f64,

    /// Added to the bridge width [default: cad.offset_mm or 0]
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub offset: Option<f64>,

    /// Lens length in millimeters
    #[arg(long, value_name = "MM")]
    pub lens_length: f64,

    /// Lens width in millimeters
    #[arg(long, value_name = "MM")]
    pub lens_width: f64,

    /// Document ID
    #[arg(long, value_name = "ID")]
    pub document: Option<String>,

    /// Workspace ID
    #[arg(long, value_name = "ID")]
    pub workspace: Option<String>,

    /// Element (part studio) ID
    #[arg(long, value_name = "ID")]
    pub element: Option<String>,

    /// API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// API access key
    #[arg(long, env = "EYEFIT_CAD_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// API secret key
    #[arg(long, env = "EYEFIT_CAD_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
}

/// Fully resolved push settings.
#[derive(Debug)]
struct PushPlan {
    base_url: String,
    target: CadTarget,
    credentials: CadCredentials,
    params: LensParameters,
}

impl PushArgs {
    /// Fill unset values from the `[cad]` section; CLI and env take precedence.
    fn resolve(self, cad: &CadSection) -> Result<PushPlan, CadError> {
        let credentials = CadCredentials {
            access_key: require(
                self.access_key.or_else(|| cad.access_key.clone()),
                "access key (EYEFIT_CAD_ACCESS_KEY or cad.access_key)",
            )?,
            secret_key: require(
                self.secret_key.or_else(|| cad.secret_key.clone()),
                "secret key (EYEFIT_CAD_SECRET_KEY or cad.secret_key)",
            )?,
        };
        let target = CadTarget {
            document_id: require(
                self.document.or_else(|| cad.document_id.clone()),
                "document ID (--document or cad.document_id)",
            )?,
            workspace_id: require(
                self.workspace.or_else(|| cad.workspace_id.clone()),
                "workspace ID (--workspace or cad.workspace_id)",
            )?,
            element_id: require(
                self.element.or_else(|| cad.element_id.clone()),
                "element ID (--element or cad.element_id)",
            )?,
        };

        Ok(PushPlan {
            base_url: self
                .base_url
                .or_else(|| cad.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            target,
            credentials,
            params: LensParameters {
                bridge_mm: self.bridge,
                offset_mm: self.offset.or(cad.offset_mm).unwrap_or(0.0),
                lens_length_mm: self.lens_length,
                lens_width_mm: self.lens_width,
            },
        })
    }
}

fn require(value: Option<String>, what: &'static str) -> Result<String, CadError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(CadError::Missing(what))
}

/// Run the push command.
pub fn run(args: PushArgs, config: &AppConfig) -> Result<ExitCode> {
    let plan = args.resolve(&config.cad)?;
    info!("Pushing to {}{}", plan.base_url, plan.target.path());

    let client = CadClient::new(&plan.base_url, plan.credentials)?;
    client.push(&plan.target, &plan.params)?;

    for variable in plan.params.variables() {
        println!("{} = {}", variable.variable_id, variable.expression);
    }
    println!("CAD model updated");

    Ok(ExitCode::Success)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args() -> PushArgs {
        PushArgs {
            bridge: 18.0,
            offset: None,
            lens_length: 50.0,
            lens_width: 40.0,
            document: Some("doc".into()),
            workspace: Some("ws".into()),
            element: Some("el".into()),
            base_url: None,
            access_key: Some("access".into()),
            secret_key: Some("secret".into()),
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let plan = args().resolve(&CadSection::default()).unwrap();

        assert_eq!(plan.base_url, DEFAULT_BASE_URL);
        assert_eq!(plan.target.path(), "/api/variables/d/doc/w/ws/e/el");
        assert!((plan.params.bridge_width_mm() - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_fills_gaps() {
        let cad = CadSection {
            base_url: Some("https://cad.example.com".into()),
            document_id: Some("cfg-doc".into()),
            offset_mm: Some(2.5),
            ..CadSection::default()
        };
        let plan = PushArgs {
            document: None,
            ..args()
        }
        .resolve(&cad)
        .unwrap();

        assert_eq!(plan.base_url, "https://cad.example.com");
        assert_eq!(plan.target.document_id, "cfg-doc");
        assert!((plan.params.bridge_width_mm() - 20.5).abs() < 1e-9);
    }

    #[test]
    fn test_cli_offset_wins() {
        let cad = CadSection {
            offset_mm: Some(2.5),
            ..CadSection::default()
        };
        let plan = PushArgs {
            offset: Some(-1.0),
            ..args()
        }
        .resolve(&cad)
        .unwrap();

        assert!((plan.params.bridge_width_mm() - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_settings() {
        let err = PushArgs {
            secret_key: None,
            ..args()
        }
        .resolve(&CadSection::default())
        .unwrap_err();
        assert!(err.to_string().contains("secret key"));

        let err = PushArgs {
            element: Some("  ".into()),
            ..args()
        }
        .resolve(&CadSection::default())
        .unwrap_err();
        assert!(err.to_string().contains("element ID"));
    }
}
