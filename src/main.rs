//! TinyTyper - Main Entry Point
//!
//! Supports two modes:
//! - CLI mode: type letters at a prompt to verify the pipeline (--cli flag)
//! - Kiosk mode: fullscreen terminal UI for the child (default)

use anyhow::Result;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinytyper::{
    AppConfig, KeyDispatcher, KeyOutcome, NullBackend, PlatformFactory, SpeechBackend,
    SpeechClient, Vocabulary,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Check for CLI mode
    let args: Vec<String> = env::args().collect();
    let cli_mode = args.iter().any(|a| a == "--cli" || a == "-c");

    if cli_mode {
        run_cli_mode().await
    } else {
        run_kiosk_mode().await
    }
}

/// Run the fullscreen kiosk for the child
async fn run_kiosk_mode() -> Result<()> {
    let _guard = init_logging(false);

    info!(
        "Starting TinyTyper v{} (Kiosk Mode)",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = AppConfig::load_or_default()?;
    info!("Configuration loaded");

    let dispatcher = build_dispatcher(&config)?;

    info!("Starting kiosk screen...");
    tinytyper::ui::run_app(&config, dispatcher).await?;

    info!("Application exited");
    Ok(())
}

/// Run in CLI mode for testing without taking over the terminal
async fn run_cli_mode() -> Result<()> {
    let _guard = init_logging(true);

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!(
        "║         TinyTyper - CLI verification mode v{}          ║",
        env!("CARGO_PKG_VERSION")
    );
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    info!(
        "Starting TinyTyper v{} (CLI Mode)",
        env!("CARGO_PKG_VERSION")
    );

    // Step 1: Load configuration
    println!("[1/3] Loading configuration...");
    let config = AppConfig::load_or_default()?;
    println!(
        "      ✅ Cooldown {} ms, startup language {:?}",
        config.input.cooldown_ms,
        config.general.startup_language()
    );

    // Step 2: Vocabulary and speech backend
    println!("[2/3] Loading vocabulary and speech backend...");
    let mut dispatcher = build_dispatcher(&config)?;
    println!("      ✅ Vocabulary and speech service ready");

    // Step 3: Ready for testing
    println!("[3/3] Initialization complete!");
    println!();
    println!("════════════════════════════════════════════════════════════");
    println!("  Commands:");
    println!("  [a-z]    press a letter key");
    println!("  [lang]   cycle language (English → Français → 中文)");
    println!("  [state]  show the current render state");
    println!("  [q]      quit");
    println!("════════════════════════════════════════════════════════════");
    println!();

    // Interactive command loop
    loop {
        print!(">>> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match cmd.to_lowercase().as_str() {
            "q" | "quit" | "exit" => {
                println!("👋 Bye!");
                info!("User requested exit");
                break;
            }
            "lang" | "language" => {
                dispatcher.cycle_language();
                let language = dispatcher.language();
                println!("🌐 Language: {} {}", language.flag(), language.display_name());
            }
            "state" => print_state(&dispatcher),
            "" => {}
            _ => {
                let mut chars = cmd.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => press_key(&mut dispatcher, c),
                    _ => {
                        println!("❓ Unknown command: {}", cmd);
                        println!("   Type a single letter, lang, state or q");
                    }
                }
            }
        }
    }

    Ok(())
}

fn press_key(dispatcher: &mut KeyDispatcher, c: char) {
    let now = Instant::now();
    match dispatcher.handle_key_press(c, now) {
        KeyOutcome::PassThrough => {
            println!("⤵️  '{}' is not a letter key, passed through", c);
        }
        KeyOutcome::Claimed => {
            let state = dispatcher.render_state(now);
            if state.progress == 100.0 {
                if let Some(entry) = state.displayed {
                    let t = entry.translation(state.language);
                    print!("🔊 {}  {}  {}", entry.letter, t.emoji, t.display_word);
                    if let Some(romanization) = &t.romanization {
                        print!(" ({})", romanization);
                    }
                    println!();
                }
            } else {
                println!("⏰ Too soon - {:.0}% of the cooldown left", state.progress);
            }
        }
    }
}

fn print_state(dispatcher: &KeyDispatcher) {
    let state = dispatcher.render_state(Instant::now());
    let language = state.language;
    println!("   language:  {} {}", language.flag(), language.display_name());
    match state.displayed {
        Some(entry) => println!(
            "   displayed: {} {}",
            entry.letter,
            entry.translation(language).display_word
        ),
        None => println!("   displayed: (none yet)"),
    }
    println!(
        "   cooldown:  active={} progress={:.0}%",
        state.cooldown_active, state.progress
    );
}

fn build_dispatcher(config: &AppConfig) -> Result<KeyDispatcher> {
    let vocabulary = Arc::new(Vocabulary::builtin()?);

    let backend: Box<dyn SpeechBackend> = if config.speech.enabled {
        PlatformFactory::create_speech_backend()
    } else {
        info!("Speech disabled in config");
        Box::new(NullBackend)
    };
    let speech = Arc::new(SpeechClient::new(backend));

    Ok(KeyDispatcher::new(
        vocabulary,
        speech,
        config.input.cooldown(),
        config.general.startup_language(),
    ))
}

/// Initialize logging. Kiosk mode owns the terminal, so its logs go to a
/// file beside the executable; CLI mode logs to stderr.
fn init_logging(stderr: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let level = if stderr {
        "tinytyper=debug"
    } else {
        "tinytyper=info"
    };
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    if stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        None
    } else {
        let log_dir = AppConfig::config_path()
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, "tinytyper.log"));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
            .init();
        Some(guard)
    }
}
