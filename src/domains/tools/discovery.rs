//! Tool module discovery.
//!
//! A tool module is a source file (or a directory with a `mod.rs`) under the
//! discovery directory that exposes a registration function. The loader scans
//! that directory, resolves every module it finds to `<namespace>::<module>`
//! in a [`ModuleCatalog`], and runs the module's registration function
//! against the shared [`ToolRegistry`].
//!
//! The catalog is the compiled-in list of modules; the scan decides which of
//! them are active. Rules:
//! - a missing discovery directory loads nothing and is not an error; the
//!   load report records it so startup can warn
//! - modules load in ascending name order, whatever order the filesystem
//!   lists them in
//! - a found module missing from the catalog, or whose registration fails,
//!   aborts the whole load
//! - a module already loaded into the registry is skipped

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::error::ToolError;
use super::registry::ToolRegistry;
use crate::core::config::{DiscoveryMode, ToolsConfig};

/// Registration entry point every tool module exposes.
pub type RegisterFn = fn(&mut ToolRegistry) -> Result<(), ToolError>;

/// Errors raised while discovering and loading tool modules.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery directory exists but could not be listed.
    #[error("Failed to read discovery directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A module was found on disk but is not compiled into the catalog.
    #[error("Tool module '{0}' was found but is not in the module catalog")]
    UnknownModule(String),

    /// A module's registration function failed.
    #[error("Tool module '{module}' failed to load: {source}")]
    ModuleFailed {
        module: String,
        #[source]
        source: ToolError,
    },
}

impl DiscoveryError {
    /// Create a directory read error.
    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// Module Catalog
// ============================================================================

/// Compiled-in mapping from qualified module name to registration function.
#[derive(Clone)]
pub struct ModuleCatalog {
    namespace: String,
    modules: BTreeMap<String, RegisterFn>,
}

impl std::fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("namespace", &self.namespace)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModuleCatalog {
    /// Create an empty catalog for modules living under `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            modules: BTreeMap::new(),
        }
    }

    /// Add a module. A later entry with the same name replaces the earlier one.
    pub fn with_module(mut self, name: &str, register: RegisterFn) -> Self {
        self.modules.insert(qualify(&self.namespace, name), register);
        self
    }

    /// Namespace prefix of the catalogued modules.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Qualified names of all catalogued modules, sorted.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Number of catalogued modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Resolve a qualified module name.
    pub fn resolve(&self, qualified: &str) -> Option<RegisterFn> {
        self.modules.get(qualified).copied()
    }
}

/// Join a namespace prefix and a module name.
pub fn qualify(namespace: &str, module: &str) -> String {
    if namespace.is_empty() {
        module.to_string()
    } else {
        format!("{}::{}", namespace, module)
    }
}

// ============================================================================
// Directory Scan
// ============================================================================

/// List the immediate tool modules in `dir`, sorted by name.
///
/// Recognised entries are `<name>.rs` files (except `mod.rs`) and
/// directories containing a `mod.rs`. Hidden entries and names that are not
/// Rust identifiers are ignored. A missing directory yields no modules.
pub fn scan_modules(dir: &Path) -> Result<Vec<String>, DiscoveryError> {
    if !dir.is_dir() {
        debug!("Discovery directory {:?} does not exist, skipping", dir);
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| DiscoveryError::read_dir(dir, e))?;

    let mut modules = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DiscoveryError::read_dir(dir, e))?;
        let path = entry.path();

        let name = if path.is_dir() {
            if !path.join("mod.rs").is_file() {
                continue;
            }
            path.file_name()
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            path.file_stem()
        } else {
            continue;
        };

        let Some(name) = name.and_then(|n| n.to_str()) else {
            continue;
        };

        if name == "mod" || !is_module_identifier(name) {
            continue;
        }

        modules.push(name.to_string());
    }

    modules.sort();
    modules.dedup();

    Ok(modules)
}

/// Whether `name` is usable as a Rust module name.
fn is_module_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        Some('_') if name.len() > 1 => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// Loader
// ============================================================================

/// Summary of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Modules whose registration ran in this pass.
    pub loaded: Vec<String>,

    /// Modules skipped because they were already loaded.
    pub skipped: Vec<String>,

    /// Tools added to the registry in this pass.
    pub tools_registered: usize,

    /// Set when the scanned discovery directory does not exist.
    pub missing_dir: Option<PathBuf>,
}

/// Loads tool modules into a registry.
#[derive(Debug, Clone)]
pub struct ToolLoader {
    catalog: ModuleCatalog,
    namespace: String,
}

impl ToolLoader {
    /// Create a loader resolving discovered modules under `namespace`.
    pub fn new(catalog: ModuleCatalog, namespace: impl Into<String>) -> Self {
        Self {
            catalog,
            namespace: namespace.into(),
        }
    }

    /// Create a loader using the catalog's own namespace.
    pub fn for_catalog(catalog: ModuleCatalog) -> Self {
        let namespace = catalog.namespace().to_string();
        Self::new(catalog, namespace)
    }

    /// Scan `dir` and load every module found there.
    #[instrument(skip(self, registry), fields(namespace = %self.namespace))]
    pub fn discover(
        &self,
        dir: &Path,
        registry: &mut ToolRegistry,
    ) -> Result<LoadReport, DiscoveryError> {
        let modules = scan_modules(dir)?;
        debug!("Found {} tool module(s) in {:?}", modules.len(), dir);

        let qualified = modules
            .iter()
            .map(|name| qualify(&self.namespace, name))
            .collect::<Vec<_>>();

        let mut report = self.load_all(qualified, registry)?;
        if !dir.is_dir() {
            report.missing_dir = Some(dir.to_path_buf());
        }
        Ok(report)
    }

    /// Load every catalogued module without scanning a directory.
    pub fn load_catalog(&self, registry: &mut ToolRegistry) -> Result<LoadReport, DiscoveryError> {
        let qualified = self
            .catalog
            .module_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        self.load_all(qualified, registry)
    }

    fn load_all(
        &self,
        modules: Vec<String>,
        registry: &mut ToolRegistry,
    ) -> Result<LoadReport, DiscoveryError> {
        let mut report = LoadReport::default();

        for module in modules {
            if registry.is_loaded(&module) {
                debug!("Tool module {} already loaded, skipping", module);
                report.skipped.push(module);
                continue;
            }

            let register = self
                .catalog
                .resolve(&module)
                .ok_or_else(|| DiscoveryError::UnknownModule(module.clone()))?;

            let before = registry.len();
            register(registry).map_err(|source| DiscoveryError::ModuleFailed {
                module: module.clone(),
                source,
            })?;
            registry.mark_loaded(&module);

            let added = registry.len() - before;
            debug!("Loaded tool module {} ({} tool(s))", module, added);
            report.tools_registered += added;
            report.loaded.push(module);
        }

        Ok(report)
    }
}

/// Build a registry according to the tool discovery configuration.
pub fn load_tools(
    config: &ToolsConfig,
    catalog: ModuleCatalog,
) -> Result<ToolRegistry, DiscoveryError> {
    let loader = ToolLoader::new(catalog, config.namespace.clone());
    let mut registry = ToolRegistry::new();

    info!(
        "Tool discovery: {:?} (namespace '{}')",
        config.discovery, config.namespace
    );

    let report = match &config.discovery {
        DiscoveryMode::Directory { path } => loader.discover(path, &mut registry)?,
        DiscoveryMode::Catalog => loader.load_catalog(&mut registry)?,
    };

    if let Some(dir) = &report.missing_dir {
        warn!(
            "Tool discovery directory {:?} does not exist; no tools were loaded from it",
            dir
        );
    }

    info!(
        "Loaded {} tool module(s), {} tool(s) registered",
        report.loaded.len(),
        report.tools_registered
    );

    Ok(registry)
}
