//! Embedded content frame
//!
//! The frame is mounted together with the game panel but stays hidden until
//! loading finishes, so the runtime is started once and never reinitialised
//! when it is revealed.

use std::path::Path;
use std::process::Stdio;
use bitflags::bitflags;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::config::RuntimeCommand;
use super::CONTENT_TARGET;
use super::protocol::ContentProtocol;

bitflags! {
    /// Sandbox relaxations granted to the frame
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Sandbox: u8 {
        const SAME_ORIGIN = 1 << 0;
        const SCRIPTS = 1 << 1;
        const POPUPS = 1 << 2;
        const FORMS = 1 << 3;
    }
}

bitflags! {
    /// Features the frame may use
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Permissions: u8 {
        const AUTOPLAY = 1 << 0;
        const FULLSCREEN = 1 << 1;
        const CROSS_ORIGIN_ISOLATED = 1 << 2;
    }
}

impl Sandbox {
    pub fn describe(self) -> String {
        let names = [
            (Sandbox::SAME_ORIGIN, "allow-same-origin"),
            (Sandbox::SCRIPTS, "allow-scripts"),
            (Sandbox::POPUPS, "allow-popups"),
            (Sandbox::FORMS, "allow-forms"),
        ];
        names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Permissions {
    pub fn describe(self) -> String {
        let names = [
            (Permissions::AUTOPLAY, "autoplay"),
            (Permissions::FULLSCREEN, "fullscreen"),
            (Permissions::CROSS_ORIGIN_ISOLATED, "cross-origin-isolated"),
        ];
        names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// External process hosting the content. Killed when dropped.
pub struct RuntimeProcess {
    child: Child,
    forwarders: Vec<JoinHandle<()>>,
}

impl RuntimeProcess {
    pub fn spawn(command: &RuntimeCommand, root: &Path) -> std::io::Result<Self> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        tracing::info!(program = %command.program, pid = ?child.id(), "Content runtime started");

        let mut forwarders = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            forwarders.push(tokio::spawn(forward_lines(stdout, false)));
        }
        if let Some(stderr) = child.stderr.take() {
            forwarders.push(tokio::spawn(forward_lines(stderr, true)));
        }
        Ok(Self { child, forwarders })
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Wait until both output streams are closed
    #[cfg(test)]
    pub async fn drain(&mut self) {
        for handle in std::mem::take(&mut self.forwarders) {
            let _ = handle.await;
        }
    }
}

impl Drop for RuntimeProcess {
    fn drop(&mut self) {
        for handle in &self.forwarders {
            handle.abort();
        }
        tracing::debug!("Content runtime stopped");
    }
}

/// Re-emit runtime output on the diagnostic channel, stderr as errors
async fn forward_lines<R: AsyncRead + Unpin>(reader: R, is_stderr: bool) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if is_stderr {
                    tracing::error!(target: CONTENT_TARGET, "{}", line);
                } else {
                    tracing::info!(target: CONTENT_TARGET, "{}", line);
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Content runtime output unreadable");
                break;
            }
        }
    }
}

pub struct ContentFrame {
    protocol: ContentProtocol,
    assets: Vec<String>,
    bundle: Option<JoinHandle<usize>>,
    locator: String,
    sandbox: Sandbox,
    permissions: Permissions,
    visible: bool,
    entry_loaded: bool,
    runtime: Option<RuntimeProcess>,
}

impl ContentFrame {
    /// Load the entry document and start the runtime, keeping the frame hidden
    pub async fn mount(
        protocol: &ContentProtocol,
        entry: &str,
        assets: &[String],
        runtime: Option<&RuntimeCommand>,
    ) -> Self {
        let locator = ContentProtocol::locator(entry);
        let response = protocol.respond(&locator).await;
        let entry_loaded = response.is_ok();
        if let Some(mime) = response.header("Content-Type") {
            tracing::debug!(mime, bytes = response.body.len(), "Entry document resolved");
        }

        let runtime = runtime.and_then(|command| {
            match RuntimeProcess::spawn(command, protocol.root()) {
                Ok(process) => Some(process),
                Err(e) => {
                    tracing::error!(program = %command.program, error = %e, "Failed to start content runtime");
                    None
                }
            }
        });

        tracing::info!(locator = %locator, entry_loaded, "Content frame mounted");

        Self {
            protocol: protocol.clone(),
            assets: assets.to_vec(),
            bundle: None,
            locator,
            sandbox: Sandbox::SAME_ORIGIN | Sandbox::SCRIPTS | Sandbox::POPUPS | Sandbox::FORMS,
            permissions: Permissions::AUTOPLAY
                | Permissions::FULLSCREEN
                | Permissions::CROSS_ORIGIN_ISOLATED,
            visible: false,
            entry_loaded,
            runtime,
        }
    }

    pub fn reveal(&mut self) {
        if !self.visible {
            tracing::debug!(locator = %self.locator, "Content frame revealed");
            self.visible = true;
        }
    }

    /// Request the content's assets through the protocol in the background.
    /// Missing files are logged on the content target like any other failed
    /// request. Only the first call has an effect.
    pub fn load_bundle(&mut self) {
        if self.bundle.is_some() || self.assets.is_empty() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, content bundle not requested");
            return;
        };

        let protocol = self.protocol.clone();
        let assets = self.assets.clone();
        self.bundle = Some(runtime.spawn(async move {
            let mut missing = 0;
            for asset in &assets {
                let response = protocol.respond(&ContentProtocol::locator(asset)).await;
                if !response.is_ok() {
                    missing += 1;
                }
            }
            tracing::info!(assets = assets.len(), missing, "Content bundle requested");
            missing
        }));
    }

    /// Wait for the bundle requests, returning how many assets were missing
    #[cfg(test)]
    pub async fn bundle_missing(&mut self) -> Option<usize> {
        match self.bundle.take() {
            Some(handle) => handle.await.ok(),
            None => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn sandbox(&self) -> Sandbox {
        self.sandbox
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn entry_loaded(&self) -> bool {
        self.entry_loaded
    }

    pub fn runtime_running(&mut self) -> bool {
        self.runtime.as_mut().is_some_and(RuntimeProcess::is_running)
    }
}

impl Drop for ContentFrame {
    fn drop(&mut self) {
        if let Some(handle) = self.bundle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use parking_lot::Mutex;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    use crate::diagnostics::{DiagnosticObserver, DiagnosticRecord, Diagnostics};
    use crate::logging::DiagnosticLayer;

    #[derive(Default)]
    struct Recorder {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl DiagnosticObserver for Recorder {
        fn observe(&self, record: &DiagnosticRecord) {
            if record.target == CONTENT_TARGET {
                self.records.lock().push((record.level, record.message.clone()));
            }
        }
    }

    #[test]
    fn flags_describe_the_frame_attributes() {
        let sandbox = Sandbox::SAME_ORIGIN | Sandbox::SCRIPTS | Sandbox::POPUPS | Sandbox::FORMS;
        assert_eq!(
            sandbox.describe(),
            "allow-same-origin allow-scripts allow-popups allow-forms"
        );
        assert_eq!(
            Permissions::all().describe(),
            "autoplay; fullscreen; cross-origin-isolated"
        );
        assert_eq!(Sandbox::empty().describe(), "");
    }

    #[tokio::test]
    async fn mounted_frame_is_hidden_until_revealed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let protocol = ContentProtocol::new(dir.path());

        let mut frame = ContentFrame::mount(&protocol, "index.html", &[], None).await;
        assert!(frame.entry_loaded());
        assert!(!frame.is_visible());
        assert!(!frame.runtime_running());
        assert_eq!(frame.locator(), "cd-content://localhost/index.html");
        assert!(frame.permissions().contains(Permissions::FULLSCREEN));

        frame.reveal();
        assert!(frame.is_visible());
    }

    #[tokio::test]
    async fn missing_entry_document_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let protocol = ContentProtocol::new(dir.path());
        let frame = ContentFrame::mount(&protocol, "index.html", &[], None).await;
        assert!(!frame.entry_loaded());
    }

    #[tokio::test]
    async fn runtime_output_is_forwarded_to_diagnostics() {
        let diagnostics = Diagnostics::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = diagnostics.subscribe(recorder.clone());
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(DiagnosticLayer::new(diagnostics)),
        );

        let dir = tempfile::tempdir().unwrap();
        let command = RuntimeCommand {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo booting; echo 'WebAssembly.instantiate failed' >&2".to_string(),
            ],
        };
        let mut process = RuntimeProcess::spawn(&command, dir.path()).unwrap();
        process.drain().await;

        let records = recorder.records.lock();
        assert!(records.contains(&(Level::INFO, "booting".to_string())));
        assert!(records.contains(&(Level::ERROR, "WebAssembly.instantiate failed".to_string())));
    }

    #[tokio::test]
    async fn bundle_requests_report_missing_assets() {
        let diagnostics = Diagnostics::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = diagnostics.subscribe(recorder.clone());
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(DiagnosticLayer::new(diagnostics)),
        );

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("index.js"), "boot()").unwrap();
        let protocol = ContentProtocol::new(dir.path());
        let assets = vec!["index.js".to_string(), "index.wasm".to_string()];

        let mut frame = ContentFrame::mount(&protocol, "index.html", &assets, None).await;
        assert_eq!(frame.bundle_missing().await, None);

        frame.load_bundle();
        frame.load_bundle();
        assert_eq!(frame.bundle_missing().await, Some(1));

        let records = recorder.records.lock();
        let failures: Vec<_> = records
            .iter()
            .filter(|(level, message)| *level == Level::ERROR && message.contains("index.wasm"))
            .collect();
        assert_eq!(failures.len(), 1);
    }
}
