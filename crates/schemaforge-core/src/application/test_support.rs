//! In-crate port doubles for service tests.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, FragmentLoader, MockReporter, StubStore},
    },
    domain::{ConfigMap, StubKind},
    error::ForgeResult,
};

#[derive(Default)]
pub struct MemoryFiles(Mutex<BTreeMap<PathBuf, String>>);

impl MemoryFiles {
    pub fn with(files: &[(&str, &str)]) -> Self {
        let fs = Self::default();
        for (path, content) in files {
            fs.0.lock().unwrap().insert(PathBuf::from(path), content.to_string());
        }
        fs
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.0.lock().unwrap().get(Path::new(path)).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .keys()
            .map(|p| p.display().to_string())
            .collect()
    }
}

impl Filesystem for MemoryFiles {
    fn create_dir_all(&self, _: &Path) -> ForgeResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        self.0.lock().unwrap().insert(path.into(), content.into());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> ForgeResult<String> {
        self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.into(),
                reason: "not found".into(),
            }
            .into()
        })
    }

    fn list_dir(&self, path: &Path) -> ForgeResult<Vec<String>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name()?.to_str().map(String::from))
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.0.lock().unwrap().contains_key(path)
    }
}

#[derive(Default)]
pub struct StaticStubs(HashMap<StubKind, String>);

impl StaticStubs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: StubKind, text: &str) -> Self {
        self.0.insert(kind, text.to_string());
        self
    }
}

impl StubStore for StaticStubs {
    fn load(&self, kind: StubKind, _module: &str, _model: &str) -> ForgeResult<String> {
        self.0.get(&kind).cloned().ok_or_else(|| {
            ApplicationError::StubNotFound {
                path: kind.file_name().to_string(),
            }
            .into()
        })
    }
}

#[derive(Default)]
pub struct StaticFragments(HashMap<String, ConfigMap>);

impl StaticFragments {
    pub fn with(mut self, path: &str, yaml: &str) -> Self {
        self.0.insert(path.to_string(), serde_yaml::from_str(yaml).unwrap());
        self
    }
}

impl FragmentLoader for StaticFragments {
    fn load_fragment(&self, _module: &str, path: &str) -> ForgeResult<Option<ConfigMap>> {
        Ok(self.0.get(path).cloned())
    }
}

/// A reporter that accepts any call.
pub fn quiet_reporter() -> MockReporter {
    let mut reporter = MockReporter::new();
    reporter.expect_written().return_const(());
    reporter.expect_skipped().return_const(());
    reporter.expect_warning().return_const(());
    reporter
}
