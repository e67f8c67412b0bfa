//! Module registry and path resolution

use crate::error::{ModuleError, RegistryError};
use crate::menu::TriggerMenu;
use crate::module::{ModuleConfig, TriggerModule};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a module instance from its menu entry
pub type ModuleFactory =
    fn(ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError>;

/// Module registry for lookup and path routing
pub struct Registry {
    /// Known module types by name
    factories: BTreeMap<String, ModuleFactory>,

    /// Instantiated modules by label
    modules: HashMap<String, Arc<dyn TriggerModule>>,

    /// Resolved paths in declaration order
    paths: Vec<TriggerPath>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            modules: HashMap::with_capacity(32),
            paths: Vec::new(),
        }
    }

    /// Register a module type
    pub fn register_type(&mut self, module_type: impl Into<String>, factory: ModuleFactory) {
        let module_type = module_type.into();
        debug!("Registering module type: {}", module_type);
        self.factories.insert(module_type, factory);
    }

    /// Add an already-built module instance
    pub fn register(&mut self, module: Arc<dyn TriggerModule>) -> Result<(), RegistryError> {
        let label = module.label().to_string();
        if self.modules.contains_key(&label) {
            return Err(RegistryError::DuplicateLabel(label));
        }
        info!("Registering module: {} ({})", label, module.config().module_type);
        self.modules.insert(label, module);
        Ok(())
    }

    /// Instantiate a module from its menu entry
    pub fn instantiate(&mut self, config: ModuleConfig) -> Result<(), RegistryError> {
        let factory = self
            .factories
            .get(&config.module_type)
            .ok_or_else(|| RegistryError::UnknownModuleType(config.module_type.clone()))?;
        let module = factory(config)?;
        self.register(module)
    }

    /// Instantiate every module of a menu and resolve its paths.
    ///
    /// Any configuration error is returned here; nothing is deferred to
    /// event processing.
    pub fn load_menu(&mut self, menu: &TriggerMenu) -> Result<(), RegistryError> {
        for config in &menu.modules {
            self.instantiate(config.clone())?;
        }

        let mut seen = HashSet::with_capacity(menu.paths.len());
        for path in &menu.paths {
            if !seen.insert(path.name.as_str()) {
                return Err(RegistryError::DuplicatePath(path.name.clone()));
            }
            let resolved = self.resolve_path(&path.name, &path.modules)?;
            info!(
                "Path {}: {} modules",
                resolved.name,
                resolved.modules.len()
            );
            self.paths.push(resolved);
        }
        Ok(())
    }

    /// Load a menu file
    pub fn load_menu_file(&mut self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let menu = TriggerMenu::load(path)?;
        self.load_menu(&menu)
    }

    fn resolve_path(&self, name: &str, labels: &[String]) -> Result<TriggerPath, RegistryError> {
        let mut modules = Vec::with_capacity(labels.len());
        for label in labels {
            let module = self
                .modules
                .get(label)
                .ok_or_else(|| RegistryError::UnknownModule {
                    path: name.to_string(),
                    label: label.clone(),
                })?;
            modules.push(Arc::clone(module));
        }
        Ok(TriggerPath {
            name: name.to_string(),
            modules,
        })
    }

    /// Registered module type names, sorted
    pub fn module_types(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn get_module(&self, label: &str) -> Option<Arc<dyn TriggerModule>> {
        self.modules.get(label).cloned()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn paths(&self) -> &[TriggerPath] {
        &self.paths
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved path: modules to run in order
#[derive(Clone)]
pub struct TriggerPath {
    pub name: String,
    pub modules: Vec<Arc<dyn TriggerModule>>,
}

impl std::fmt::Debug for TriggerPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.modules.iter().map(|m| m.label()).collect();
        f.debug_struct("TriggerPath")
            .field("name", &self.name)
            .field("modules", &labels)
            .finish()
    }
}
