//! Config fragments: partial field-sets and `includes`.
//!
//! A fragment lives at `Modules/{Module}/Data/{path}` and must hold a
//! mapping. The format follows the extension: `.json`, `.php` (a
//! `return [...]` file) or YAML for anything else.

use std::path::Path;

use tracing::{debug, instrument};

use schemaforge_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, FragmentLoader},
    },
    domain::{ConfigMap, ConfigValue, RelativePath, php},
    error::ForgeResult,
};

#[derive(Debug, Clone)]
pub struct ModuleFragmentLoader<F> {
    filesystem: F,
}

impl<F: Filesystem> ModuleFragmentLoader<F> {
    pub fn new(filesystem: F) -> Self {
        Self { filesystem }
    }
}

impl<F: Filesystem> FragmentLoader for ModuleFragmentLoader<F> {
    #[instrument(skip(self))]
    fn load_fragment(&self, module: &str, path: &str) -> ForgeResult<Option<ConfigMap>> {
        let location = RelativePath::module_dir(module)?
            .join("Data")?
            .join(path.trim_start_matches('/'))?;
        if !self.filesystem.exists(location.as_path()) {
            debug!(%location, "Fragment not found");
            return Ok(None);
        }

        let source = self.filesystem.read_file(location.as_path())?;
        let malformed = |reason: String| ApplicationError::MalformedFragment {
            path: location.to_string(),
            reason,
        };
        let map = parse(location.as_path(), &source).map_err(malformed)?;
        Ok(Some(map))
    }
}

fn parse(path: &Path, source: &str) -> Result<ConfigMap, String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => serde_json::from_str(source).map_err(|e| e.to_string()),
        Some("php") => match php::parse_return(source).map_err(|e| e.to_string())? {
            ConfigValue::Map(map) => Ok(map),
            ConfigValue::List(items) if items.is_empty() => Ok(ConfigMap::new()),
            _ => Err("expected an associative array".into()),
        },
        _ => {
            if source.trim().is_empty() {
                return Ok(ConfigMap::new());
            }
            serde_yaml::from_str(source).map_err(|e| e.to_string())
        }
    }
}
