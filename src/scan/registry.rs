//! The static, ordered list of probes a scan runs.

use crate::adapters::{
    ChromiumBrowser, CommandExecutor, DataDirProfileFinder, EnvUsernameRetriever, Hive, ProfileFinder,
    RegQueryKey, RegistryKey, SystemCommandExecutor, UsernameRetriever,
};
use crate::check::CheckResult;
use crate::probes::{self, Permission, guest_account::GuestAccountCommands};
use std::collections::HashSet;
use std::sync::Arc;

/// Zero-argument probe invocation with its adapters already bound.
pub type ProbeFn = Box<dyn Fn() -> CheckResult + Send + Sync>;

/// A named entry of the registry.
pub struct Probe {
    name: String,
    run: ProbeFn,
}

impl Probe {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> CheckResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self) -> CheckResult {
        (self.run)()
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe").field("name", &self.name).finish()
    }
}

/// Ordered collection of probes. Results are always reported in this order.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    probes: Vec<Probe>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe.
    pub fn register<F>(mut self, name: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> CheckResult + Send + Sync + 'static,
    {
        self.probes.push(Probe::new(name, run));
        self
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Probe> {
        self.probes.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.probes.iter().map(Probe::name).collect()
    }

    /// Drop the probes whose names appear in `disabled`, keeping order.
    pub fn without(mut self, disabled: &HashSet<String>) -> Self {
        self.probes.retain(|p| !disabled.contains(p.name()));
        self
    }

    /// The compiled-in probe list, bound to `adapters`.
    pub fn standard(adapters: &HostAdapters) -> Self {
        let mut registry = Self::new();

        for permission in Permission::ALL {
            let current_user = Arc::clone(&adapters.current_user);
            registry = registry.register(format!("permission_{}", permission.as_str()), move || {
                probes::permission(permission, current_user.as_ref())
            });
        }

        let local_machine = Arc::clone(&adapters.local_machine);
        registry = registry.register("secure_boot", move || {
            probes::secure_boot(local_machine.as_ref())
        });

        let commands = Arc::clone(&adapters.commands);
        registry = registry.register("smb", move || {
            probes::smb(commands.as_ref(), commands.as_ref())
        });

        let commands = Arc::clone(&adapters.commands);
        let username = Arc::clone(&adapters.username);
        registry = registry.register("guest_account", move || {
            probes::guest_account(
                &GuestAccountCommands::all(commands.as_ref()),
                username.as_ref(),
            )
        });

        let commands = Arc::clone(&adapters.commands);
        registry = registry.register("uac", move || probes::uac(commands.as_ref()));

        let local_machine = Arc::clone(&adapters.local_machine);
        registry = registry.register("remote_desktop", move || {
            probes::remote_desktop(local_machine.as_ref())
        });

        let profiles = Arc::clone(&adapters.profiles);
        registry = registry.register("extensions_firefox", move || {
            probes::extensions_firefox(profiles.as_ref()).0
        });

        let profiles = Arc::clone(&adapters.profiles);
        registry = registry.register("adblock_firefox", move || {
            probes::adblocker_firefox(profiles.as_ref())
        });

        for browser in [ChromiumBrowser::Chrome, ChromiumBrowser::Edge] {
            let profiles = Arc::clone(&adapters.profiles);
            registry = registry.register(format!("search_engine_{}", browser.as_str()), move || {
                probes::search_engine(browser, profiles.as_ref())
            });
        }

        let commands = Arc::clone(&adapters.commands);
        let local_machine = Arc::clone(&adapters.local_machine);
        registry.register("installed_software", move || {
            probes::installed_software(commands.as_ref(), local_machine.as_ref())
        })
    }
}

/// The side-effect adapters the standard probes are bound to.
#[derive(Clone)]
pub struct HostAdapters {
    pub commands: Arc<dyn CommandExecutor>,
    pub local_machine: Arc<dyn RegistryKey>,
    pub current_user: Arc<dyn RegistryKey>,
    pub profiles: Arc<dyn ProfileFinder>,
    pub username: Arc<dyn UsernameRetriever>,
}

impl HostAdapters {
    /// Adapters that inspect the running host.
    pub fn system() -> Self {
        let commands: Arc<dyn CommandExecutor> = Arc::new(SystemCommandExecutor);
        Self {
            local_machine: Arc::new(RegQueryKey::hive(Hive::LocalMachine, Arc::clone(&commands))),
            current_user: Arc::new(RegQueryKey::hive(Hive::CurrentUser, Arc::clone(&commands))),
            commands,
            profiles: Arc::new(DataDirProfileFinder::new()),
            username: Arc::new(EnvUsernameRetriever),
        }
    }
}
