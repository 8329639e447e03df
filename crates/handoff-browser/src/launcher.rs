use crate::{Error, Result};
use handoff_core::LaunchSpec;
use std::process::{Command, Stdio};

/// Starts browser processes. Fire-and-forget: failures are logged by the
/// implementation.
pub trait Launcher {
    fn launch(&self, spec: &LaunchSpec);
}

impl<T: Launcher + ?Sized> Launcher for &T {
    fn launch(&self, spec: &LaunchSpec) {
        (**self).launch(spec)
    }
}

/// Launches browsers as detached child processes.
///
/// On macOS the launch goes through `open(1)` so a running instance can be
/// reused; elsewhere the executable is spawned directly.
#[derive(Debug, Clone, Copy)]
pub struct ProcessLauncher {
    use_open: bool,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self {
            use_open: cfg!(target_os = "macos"),
        }
    }
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher {
    /// Spawn the process for `spec` without waiting for it
    pub fn spawn(&self, spec: &LaunchSpec) -> Result<()> {
        let (program, args) = build_command_line(spec, self.use_open);
        tracing::info!("Launching {} {:?}", program, args);

        Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| Error::Launch {
                path: spec.executable_path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, spec: &LaunchSpec) {
        if let Err(e) = self.spawn(spec) {
            tracing::error!("{}", e);
        }
    }
}

/// Program and arguments used to start `spec`
pub fn build_command_line(spec: &LaunchSpec, use_open: bool) -> (String, Vec<String>) {
    let executable = spec.executable_path.display().to_string();
    let direct_urls = spec.urls_passed_directly.iter().map(|u| u.as_str().to_string());

    if !use_open {
        let args = spec.arguments.iter().cloned().chain(direct_urls).collect();
        return (executable, args);
    }

    let mut args = vec!["-a".to_string(), executable];
    if spec.force_new_instance {
        args.push("-n".to_string());
    }
    args.extend(direct_urls);
    if !spec.arguments.is_empty() {
        args.push("--args".to_string());
        args.extend(spec.arguments.iter().cloned());
    }
    ("open".to_string(), args)
}

/// Records launches instead of starting processes
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launched: std::sync::Mutex<Vec<LaunchSpec>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<LaunchSpec> {
        match self.launched.lock() {
            Ok(launched) => launched.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, spec: &LaunchSpec) {
        match self.launched.lock() {
            Ok(mut launched) => launched.push(spec.clone()),
            Err(poisoned) => poisoned.into_inner().push(spec.clone()),
        }
    }
}
