//! Run configuration.
//!
//! A TOML document naming every artifact a comparison run reads. Relative
//! paths resolve against the directory holding the configuration file.
//!
//! ```toml
//! [bundle]
//! reference = "reference/omni.ja"
//! device = "device/omni.ja"
//!
//! [webidl]
//! declarations = ["webidl/Navigator.webidl"]
//! [webidl.observed]
//! web = "device/webidl_web.json"
//!
//! [global_objects.reference]
//! web = "reference/window_web.json"
//! [global_objects.device]
//! web = "device/window_web.json"
//!
//! [informative]
//! buildprops = "device/build.prop"
//!
//! [logging]
//! profile = "production"
//! ```

use crate::errors::{io_error, CertError, Result};
use crate::logging_facility::Profile;
use crate::model::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunConfigDocument {
    bundle: Option<BundleSection>,
    #[serde(default)]
    webidl: WebIdlSection,
    #[serde(default)]
    global_objects: GlobalObjectsSection,
    #[serde(default)]
    informative: InformativeSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BundleSection {
    reference: Option<String>,
    device: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WebIdlSection {
    #[serde(default)]
    declarations: Vec<String>,
    #[serde(default)]
    observed: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlobalObjectsSection {
    #[serde(default)]
    reference: BTreeMap<String, String>,
    #[serde(default)]
    device: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InformativeSection {
    omni_result: Option<String>,
    application_ini: Option<String>,
    headers: Option<String>,
    buildprops: Option<String>,
    kernel_version: Option<String>,
    processes_running: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    profile: Option<String>,
}

/// Reference and device script bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub reference: PathBuf,
    pub device: PathBuf,
}

/// Paths to each informative record; `None` when not collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InformativePaths {
    pub omni_result: Option<PathBuf>,
    pub application_ini: Option<PathBuf>,
    pub headers: Option<PathBuf>,
    pub buildprops: Option<PathBuf>,
    pub kernel_version: Option<PathBuf>,
    pub processes_running: Option<PathBuf>,
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub bundle: Option<BundlePaths>,
    pub webidl_declarations: Vec<PathBuf>,
    pub webidl_observed: BTreeMap<Context, PathBuf>,
    pub global_objects_reference: BTreeMap<Context, PathBuf>,
    pub global_objects_device: BTreeMap<Context, PathBuf>,
    pub informative: InformativePaths,
    pub logging_profile: Profile,
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}

fn resolve_contexts(
    base_dir: &Path,
    entries: BTreeMap<String, String>,
) -> Result<BTreeMap<Context, PathBuf>> {
    let mut resolved = BTreeMap::new();
    for (name, path) in entries {
        let context: Context = name.parse()?;
        resolved.insert(context, resolve(base_dir, &path));
    }
    Ok(resolved)
}

impl RunConfig {
    /// Read and resolve a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&text, base_dir)
    }

    /// Parse configuration text, resolving relative paths against `base_dir`.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self> {
        let document: RunConfigDocument =
            toml::from_str(text).map_err(|e| CertError::InvalidConfig {
                reason: e.to_string(),
            })?;

        let bundle = match document.bundle {
            None => None,
            Some(BundleSection {
                reference: Some(reference),
                device: Some(device),
            }) => Some(BundlePaths {
                reference: resolve(base_dir, &reference),
                device: resolve(base_dir, &device),
            }),
            Some(_) => {
                return Err(CertError::InvalidConfig {
                    reason: "[bundle] needs both reference and device".to_string(),
                }
                .into())
            }
        };

        let logging_profile = match document.logging.profile {
            Some(name) => name.parse::<Profile>()?,
            None => Profile::default(),
        };

        let informative = document.informative;
        let resolve_opt = |p: Option<String>| p.map(|p| resolve(base_dir, &p));

        Ok(RunConfig {
            bundle,
            webidl_declarations: document
                .webidl
                .declarations
                .iter()
                .map(|p| resolve(base_dir, p))
                .collect(),
            webidl_observed: resolve_contexts(base_dir, document.webidl.observed)?,
            global_objects_reference: resolve_contexts(
                base_dir,
                document.global_objects.reference,
            )?,
            global_objects_device: resolve_contexts(base_dir, document.global_objects.device)?,
            informative: InformativePaths {
                omni_result: resolve_opt(informative.omni_result),
                application_ini: resolve_opt(informative.application_ini),
                headers: resolve_opt(informative.headers),
                buildprops: resolve_opt(informative.buildprops),
                kernel_version: resolve_opt(informative.kernel_version),
                processes_running: resolve_opt(informative.processes_running),
            },
            logging_profile,
        })
    }
}
