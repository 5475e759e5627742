use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::*;

use autoedm_core::{
    export, CategoryId, Config, EmailGenerator, EmailPreview, FormInput, GenerationSession,
    OpenAIClient, CATEGORIES,
};

mod app;
mod clipboard;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use clipboard::{ClipboardSink, SystemClipboard};

const INCOMPLETE_MESSAGE: &str =
    "The model returned an empty subject or body. Please try again.";

#[derive(Parser)]
#[command(name = "autoedm", version)]
#[command(about = "AI-powered personalized email content generator")]
struct Cli {
    /// Model to use for generation (overrides the config file)
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive form (default)
    Tui,
    /// Generate email copy once and print the preview
    Generate {
        /// Favorite shopping category (A, B, C or D)
        #[arg(short, long, value_parser = parse_category)]
        category: CategoryId,
        /// Customer name
        #[arg(short, long)]
        name: Option<String>,
        /// Something the customer recently purchased
        #[arg(short, long)]
        purchase: Option<String>,
        /// Copy the plain-text email to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// List the shopping categories
    Categories,
}

fn parse_category(s: &str) -> Result<CategoryId, String> {
    CategoryId::from_str(s).ok_or_else(|| format!("unknown category '{}', expected A, B, C or D", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            // Logging is best effort; the UI works without it
            if let Err(e) = logging::init_file_logging() {
                eprintln!("{} file logging disabled: {:#}", "Warning:".yellow(), e);
            }
            let (generator, has_api_key) = build_generator(cli.model.as_deref())?;
            run_tui(generator, has_api_key).await
        }
        Commands::Generate { category, name, purchase, copy } => {
            logging::init_stderr_logging()?;
            let (generator, _) = build_generator(cli.model.as_deref())?;
            let form = FormInput::new(
                name.unwrap_or_default(),
                Some(category),
                purchase.unwrap_or_default(),
            );
            let mut clipboard = copy.then(SystemClipboard::new);
            generate_once(
                &generator,
                &form,
                clipboard.as_mut().map(|c| c as &mut dyn ClipboardSink),
            )
            .await
        }
        Commands::Categories => {
            list_categories();
            Ok(())
        }
    }
}

fn build_generator(model: Option<&str>) -> Result<(EmailGenerator, bool)> {
    let config = Config::load()?;
    let api_key = config.api_key();
    if api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set - generation requests will fail");
    }

    let client = OpenAIClient::with_base_url(api_key.as_deref(), config.base_url());
    let has_api_key = client.has_api_key();
    let settings = config.generation_settings(model);
    tracing::info!(model = %settings.model, "using completion model");

    Ok((EmailGenerator::new(Arc::new(client), settings), has_api_key))
}

async fn run_tui(generator: EmailGenerator, has_api_key: bool) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(generator, has_api_key);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => {
                    let tx = events.sender();
                    handler::handle_event(&mut app, event, &tx).await?;
                }
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}

/// Runs one generation cycle and prints the preview. The preview is neither
/// printed nor copied unless both the subject and the body came back.
async fn generate_once(
    generator: &EmailGenerator,
    form: &FormInput,
    clipboard: Option<&mut dyn ClipboardSink>,
) -> Result<()> {
    println!(
        "🤖 Generating email copy with {}...\n",
        generator.settings().model.bold().magenta()
    );

    let mut session = GenerationSession::new();
    // Only the user-facing message; the cause is already in the log
    generator
        .generate(form, &mut session)
        .await
        .map_err(|e| anyhow!(e.to_string()))?;

    if !session.result.is_complete() {
        tracing::warn!("generation finished without both subject and body");
        return Err(anyhow!(INCOMPLETE_MESSAGE));
    }

    print_preview(&EmailPreview::compose(form, &session.result));

    if let Some(clipboard) = clipboard {
        let text = export::plain_text(form, &session.result);
        clipboard.copy(&text)?;
        println!("\n{}", "Email content copied to clipboard!".green());
    }

    Ok(())
}

fn print_preview(preview: &EmailPreview) {
    println!("{}", "📧 Email Preview".bold().blue());
    println!("{}", "=".repeat(50).dimmed());
    println!("{} {}", "Subject:".bold(), preview.subject_line.bold().white().on_blue());
    println!("\n{}", preview.hero_banner.bold().yellow());
    println!("\n{}", preview.greeting.bold());
    println!("\n{}", preview.body);
    println!("\n{}", preview.call_to_action.bold().green());
    println!("{}", preview.fine_print.dimmed());

    for card in &preview.highlights {
        let badge = if card.is_favorite {
            format!("  {}", autoedm_core::preview::FAVORITE_BADGE.cyan())
        } else {
            String::new()
        };
        println!("\n{} {}{}", card.category.icon, card.category.title.bold(), badge);
        println!("   {}", card.category.description.dimmed());
    }

    println!("\n{}", "=".repeat(50).dimmed());
    println!("{}", preview.footer);
}

fn list_categories() {
    println!("\n{}", "🛍️  Shopping Categories".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    for category in CATEGORIES.iter() {
        println!("\n{} {}", category.icon, category.title.bold().green());
        println!("  {}", category.description.dimmed());
    }
}
