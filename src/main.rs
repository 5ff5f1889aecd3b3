use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use centre_admin::api::Session;
use centre_admin::data::DashboardData;
use centre_admin::source::{fetch_dataset, DataSource, FileSource, HttpSource};
use centre_admin::{events, logging, ui, App, Settings};

/// Fixture read when neither a file nor a backend is given.
const DEFAULT_DATASET: &str = "centre.json";

#[derive(Parser, Debug)]
#[command(name = "centre-admin", version)]
#[command(about = "Terminal administration dashboard for a sports center")]
struct Args {
    /// Dataset fixture (JSON) to browse [default: centre.json]
    #[arg(short, long, conflicts_with = "gateway")]
    file: Option<PathBuf>,

    /// Gateway URL; switches to live mode against the backends
    #[arg(short, long)]
    gateway: Option<String>,

    /// Payment service URL
    #[arg(long)]
    payment_url: Option<String>,

    /// Payment intent API URL
    #[arg(long)]
    intent_url: Option<String>,

    /// Username for the gateway and the payment token
    #[arg(short, long)]
    user: Option<String>,

    /// Password for the gateway and the payment token
    #[arg(short, long)]
    password: Option<String>,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows per table page
    #[arg(long)]
    page_size: Option<usize>,

    /// Seconds between automatic refreshes in live mode
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Export the adapted dataset to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Append logs to this file (RUST_LOG overrides the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Configured settings with command-line flags applied on top.
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(ref url) = self.gateway {
            settings.gateway_url = url.clone();
        }
        if let Some(ref url) = self.payment_url {
            settings.payment_url = url.clone();
        }
        if let Some(ref url) = self.intent_url {
            settings.intent_url = url.clone();
        }
        if let Some(ref user) = self.user {
            settings.username = Some(user.clone());
        }
        if let Some(ref password) = self.password {
            settings.password = Some(password.clone());
        }
        if let Some(size) = self.page_size {
            settings.page_size = size;
        }
        if let Some(secs) = self.refresh {
            settings.refresh_secs = secs;
        }
        Ok(settings)
    }

    /// Live mode with `--gateway`, or when credentials are configured and no
    /// file was given.
    fn live(&self, settings: &Settings) -> bool {
        self.file.is_none() && (self.gateway.is_some() || settings.credentials().is_some())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;

    let settings = args.settings()?;
    tracing::debug!(gateway = %settings.gateway_url, page_size = settings.page_size, "settings loaded");

    let file = args
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    if let Some(ref export_path) = args.export {
        return if args.live(&settings) {
            export_from_backend(&settings, export_path)
        } else {
            write_export(&DashboardData::load(&file)?, export_path)
        };
    }

    if args.live(&settings) {
        run_with_backend(&settings)
    } else {
        run_with_file(&file, settings.page_size)
    }
}

/// Run against a dataset fixture file
fn run_with_file(path: &Path, page_size: usize) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, page_size, Duration::from_secs(1))
}

/// Log in, then run against the live backends
fn run_with_backend(settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        let session = login(settings).await?;
        Ok::<_, anyhow::Error>(HttpSource::spawn(session, settings.refresh_interval()))
    })?;

    // The sync task keeps running on the runtime's workers while the UI
    // owns the main thread
    let result = run_tui(Box::new(source), settings.page_size, Duration::from_millis(100));

    rt.shutdown_timeout(Duration::from_secs(1));
    result
}

async fn login(settings: &Settings) -> Result<Session> {
    let Some((username, password)) = settings.credentials() else {
        anyhow::bail!("Identifiants requis : utilisez --user et --password");
    };

    let mut session = Session::from_settings(settings)?;
    println!("Connexion à {}...", settings.gateway_url);
    session
        .login(username, password)
        .await
        .map_err(|e| anyhow::anyhow!("Échec de la connexion : {}", e))?;

    if !session.payments_available() {
        println!("Service de paiement indisponible : les paiements ne seront pas affichés");
    }
    Ok(session)
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, page_size: usize, poll_interval: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source, page_size);
    app.reload_data();

    let result = run_app(&mut terminal, &mut app, poll_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poll_interval: Duration,
) -> Result<()> {
    let mut last_poll = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let content = ui::content_area(Rect::new(0, 0, size.width, size.height));
                    events::handle_mouse_event(app, mouse, content);
                }
                // Redrawn on the next iteration
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_poll.elapsed() >= poll_interval {
            app.reload_data();
            last_poll = Instant::now();
        }
    }

    Ok(())
}

/// Log in, fetch everything once, and export it
fn export_from_backend(settings: &Settings, export_path: &Path) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let dataset = rt.block_on(async {
        let session = login(settings).await?;
        Ok::<_, anyhow::Error>(fetch_dataset(&session).await?)
    })?;
    write_export(&DashboardData::from_dataset(&dataset), export_path)
}

fn write_export(data: &DashboardData, export_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&data.to_export())?;
    std::fs::write(export_path, json)?;
    println!("Export écrit dans : {}", export_path.display());
    Ok(())
}
