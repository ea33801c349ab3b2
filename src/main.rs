//! codesplit 命令行入口：拆分 / 合并 / 运行 / 合并视图

mod cli;
mod logging;

use cli::{CliArgs, CliCommand};
use codesplit::kernel::services::adapters::{load_or_create_settings, AppMessage, AsyncRuntime};
use codesplit::kernel::services::ports::{Settings, SplitConfig};
use codesplit::kernel::split::{self, MetadataStore, SplitError, Splitter};
use codesplit::kernel::virtual_doc::{read_combined_blocking, view_uri};
use codesplit::kernel::{CombinedDocumentProvider, RunnerTable};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

const WATCH_TICK: Duration = Duration::from_millis(100);

struct Host {
    cwd: PathBuf,
    settings: Settings,
    config: SplitConfig,
    store: MetadataStore,
}

fn main() {
    let _logging = logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = match cli::parse_args(&args) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::info!(error = %e, "command failed");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: CliArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if args.command == CliCommand::Help {
        println!("{}", cli::USAGE);
        return Ok(0);
    }

    let cwd = std::env::current_dir()?;
    let root = cli::resolve_root(&cwd, args.root.as_deref())?;
    let settings = load_or_create_settings();
    let config = SplitConfig::from_settings(&settings);
    let store = MetadataStore::load_from(config.metadata_path(&root));
    let mut host = Host {
        cwd,
        settings,
        config,
        store,
    };

    match args.command {
        CliCommand::Split { file, max_lines } => host.split(&file, max_lines)?,
        CliCommand::Combine { file } => {
            host.combine(&file)?;
        }
        CliCommand::Run { file } => return Ok(host.combine_and_run(&file)?),
        CliCommand::View { file } => host.view(&file)?,
        CliCommand::Watch { file } => host.watch(&file)?,
        CliCommand::List => host.list(),
        CliCommand::Forget { file } => host.forget(&file)?,
        CliCommand::Help => {}
    }
    Ok(0)
}

impl Host {
    fn path(&self, file: &Path) -> PathBuf {
        cli::absolute(&self.cwd, file)
    }

    fn split(&mut self, file: &Path, max_lines: Option<usize>) -> split::Result<()> {
        let original = self.path(file);
        let text =
            std::fs::read_to_string(&original).map_err(|e| SplitError::part_read(&original, e))?;

        let config = match max_lines {
            Some(n) => self.config.clone().with_max_lines(n),
            None => self.config.clone(),
        };
        let outcome = Splitter::from_config(&config)?.split(&mut self.store, &original, &text)?;

        println!("File split into {} parts", outcome.parts.len());
        for part in &outcome.parts {
            println!("  {}", part.display());
        }
        if !outcome.persisted {
            eprintln!(
                "warning: split metadata could not be saved to {}",
                self.store.path().display()
            );
        }
        Ok(())
    }

    fn combine(&self, file: &Path) -> split::Result<PathBuf> {
        let outcome = split::combine(&self.store, &self.path(file))?;
        let name = outcome
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Files combined into: {}", name);
        Ok(outcome.path)
    }

    fn combine_and_run(&self, file: &Path) -> split::Result<i32> {
        let combined = self.combine(file)?;
        let status = RunnerTable::from_settings(&self.settings).run(&combined)?;
        Ok(status.code().unwrap_or(1))
    }

    fn view(&self, file: &Path) -> split::Result<()> {
        let uri = view_uri(&self.store, &self.path(file))?;
        let parts = self.store.lookup_parts(uri.original()).unwrap_or_default();
        print!("{}", read_combined_blocking(parts));
        Ok(())
    }

    fn watch(&mut self, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let uri = view_uri(&self.store, &self.path(file))?;
        let parts = self
            .store
            .lookup_parts(uri.original())
            .unwrap_or_default()
            .to_vec();

        let mut provider = CombinedDocumentProvider::new(&self.store)?;
        let changes = provider.on_did_change();

        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx)?;
        let stop = install_stop_signals()?;

        println!("watching {} ({} parts), Ctrl-C to stop", uri, parts.len());
        runtime.load_combined(uri.clone(), parts);

        loop {
            if stop.try_recv().is_ok() {
                break;
            }

            provider.sync_watches(&self.store);
            provider.poll_changes();
            for changed in changes.drain() {
                if changed != uri {
                    continue;
                }
                if let Some(parts) = self.store.lookup_parts(changed.original()) {
                    runtime.load_combined(changed.clone(), parts.to_vec());
                }
            }

            while let Ok(message) = rx.try_recv() {
                let AppMessage::CombinedContent { uri, content } = message;
                println!("----- {} -----", uri);
                println!("{}", content);
            }

            std::thread::sleep(WATCH_TICK);
        }

        provider.dispose();
        Ok(())
    }

    fn list(&self) {
        let records = self.store.all_records();
        if records.is_empty() {
            println!("no split files registered in {}", self.store.path().display());
            return;
        }
        for (original, record) in records {
            println!("{} ({} parts)", original.display(), record.parts.len());
            for part in record.parts {
                println!("  {}", part.display());
            }
        }
    }

    fn forget(&mut self, file: &Path) -> split::Result<()> {
        let original = split::resolve_original(&self.store, &self.path(file))?;
        match self.store.remove(&original)? {
            Some(record) => println!(
                "forgot {} ({} parts left on disk)",
                original.display(),
                record.parts.len()
            ),
            None => return Err(SplitError::NotSplit(original)),
        }
        Ok(())
    }
}

#[cfg(unix)]
fn install_stop_signals() -> std::io::Result<mpsc::Receiver<i32>> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let (tx, rx) = mpsc::channel();
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::spawn(move || {
        for sig in signals.forever() {
            if tx.send(sig).is_err() {
                break;
            }
        }
    });
    Ok(rx)
}

#[cfg(not(unix))]
fn install_stop_signals() -> std::io::Result<mpsc::Receiver<i32>> {
    let (_, rx) = mpsc::channel();
    Ok(rx)
}
