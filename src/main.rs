use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use pocket::app::{pump_background, App, Field, InputMode, StatusLevel};
use pocket::config;
use pocket::core::CopyTarget;
use pocket::domain::chain::{ChainOverride, ChainRegistry};
use pocket::infrastructure::runtime::{RuntimeBridge, RuntimeCommand};
use pocket::logging;
use pocket::ui;
use pocket::wallet::WalletBackend;

#[derive(Debug, Parser)]
#[command(
    name = "pocket",
    version,
    about = "Pocket: a terminal wallet for EVM test networks"
)]
struct Args {
    /// Chain id to use (default: 11155111, Sepolia)
    #[arg(long)]
    chain: Option<String>,

    /// Override the chain's HTTP JSON-RPC endpoint
    #[arg(long)]
    rpc: Option<String>,

    /// Block explorer API key for transaction history
    #[arg(long)]
    api_key: Option<String>,

    /// Config file (default: $POCKET_CONFIG or ~/.config/pocket/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: <data dir>/pocket.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the supported chains and exit
    #[arg(long)]
    list_chains: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_error) = match config::load(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (config::Config::default(), Some(format!("{err:#}"))),
    };

    let log_error = match args.log_file.clone().or_else(|| config.log_file()) {
        Some(path) => logging::init(&path, config.log_level())
            .err()
            .map(|err| format!("Logging disabled: {err:#}")),
        None => Some("Logging disabled: no data directory".to_string()),
    };
    if let Some(err) = config_error.as_deref() {
        tracing::warn!(error = %err, "Using default config");
    }

    let chain_id = args
        .chain
        .clone()
        .unwrap_or_else(|| config.chain_id().to_string());

    let mut overrides = config.chains.clone();
    if let Some(rpc) = args.rpc.clone() {
        overrides.push(ChainOverride {
            id: chain_id.clone(),
            rpc: Some(rpc),
            ..Default::default()
        });
    }
    let registry = ChainRegistry::builtin().with_overrides(&overrides)?;

    if args.list_chains {
        for chain in registry.chains() {
            println!("{:<10} {:<16} {}", chain.chain_id, chain.name, chain.rpc_url);
        }
        return Ok(());
    }

    let chain = registry.lookup(&chain_id)?.clone();
    let api_key = args
        .api_key
        .clone()
        .or_else(|| config.explorer_api_key.clone())
        .unwrap_or_default();

    let backend = WalletBackend::connect(&chain, &api_key)?;
    let rpc_endpoint = backend.endpoint_name();
    let runtime = RuntimeBridge::new(backend)?;

    let mut app = App::new(chain, rpc_endpoint);
    if let Some(err) = config_error.or(log_error) {
        app.set_status(err, StatusLevel::Warn);
    } else if api_key.is_empty() {
        app.set_status(
            "No explorer API key set; history may be rate limited",
            StatusLevel::Warn,
        );
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %format!("{err:#}"), "Exited with error");
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if let Some((label, text)) = app.take_clipboard_request() {
            copy_to_clipboard(&mut app, label, &text);
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Editing(_) => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Char('n') => app.create_account(),
        KeyCode::Char('i') => app.toggle_recovery(),
        KeyCode::Char('d') => app.start_editing(Field::Destination),
        KeyCode::Char('a') => app.start_editing(Field::Amount),
        KeyCode::Char('s') => app.submit_transfer(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('y') => {
            let action = app.copy(CopyTarget::Address);
            app.apply_action(action);
        }
        KeyCode::Char('Y') => {
            let action = app.copy(CopyTarget::TxLink);
            app.apply_action(action);
        }
        KeyCode::Esc => {
            if app.recovery_open {
                app.toggle_recovery();
            } else {
                app.dismiss_banner();
            }
        }
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.stop_editing(),
        KeyCode::Enter => app.submit_field(),
        KeyCode::Tab => app.next_field(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.push_char(ch);
        }
        _ => {}
    }
}

fn copy_to_clipboard(app: &mut App, label: &str, text: &str) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(text).is_ok() {
                app.set_status(format!("Copied {label}"), StatusLevel::Info);
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}
