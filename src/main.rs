use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use mdxml::{Config, ConverterRegistry, Diagnostics, NestedXmlConverter, Pipeline};

#[derive(Parser)]
#[command(name = "mdxml")]
#[command(about = "Convert Markdown into nested XML")]
struct Cli {
    /// Input Markdown file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Output XML file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file
    #[arg(short, long, default_value = "mdxml.toml")]
    config: PathBuf,

    /// Converter id, overriding the config
    #[arg(long)]
    converter: Option<String>,

    /// List available converters and exit
    #[arg(long)]
    list: bool,

    /// Convert the built-in sample document instead of INPUT
    #[arg(long, conflicts_with = "input")]
    sample: bool,

    /// Print timing and messages to stderr
    #[arg(long)]
    diagnostics: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Using config {:?}", config);

    let mut registry = ConverterRegistry::new();
    registry.register(NestedXmlConverter::with_options(
        config.output.render_options(),
    ));

    let converter_id = cli.converter.as_deref().unwrap_or(&config.converter);
    if let Err(e) = registry.set_active(converter_id) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if cli.list {
        let active = registry.get_active().map(|c| c.id().to_string());
        for converter in registry.list_converters() {
            let marker = if active.as_deref() == Some(converter.id()) {
                "*"
            } else {
                " "
            };
            println!(
                "{} {}\t{}\t{}",
                marker,
                converter.id(),
                converter.label(),
                converter.description()
            );
        }
        return;
    }

    // Read input
    let markdown = if cli.sample {
        mdxml::SAMPLE_MARKDOWN.to_string()
    } else {
        match read_input(cli.input.as_ref()) {
            Ok(content) => content,
            Err(e) => {
                let source = cli
                    .input
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "stdin".to_string());
                eprintln!("Error reading {}: {}", source, e);
                std::process::exit(1);
            }
        }
    };

    let markdown = Pipeline::from_config(&config).run(markdown);
    let result = registry.convert(&markdown);

    if cli.diagnostics {
        print_diagnostics(&result.diagnostics);
    }

    match cli.output {
        Some(output) => {
            if let Err(e) = fs::write(&output, &result.output) {
                eprintln!("Error writing {}: {}", output.display(), e);
                std::process::exit(1);
            }
            log::info!("Created {}", output.display());
        }
        None => println!("{}", result.output),
    }
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    if let Some(strategy) = &diagnostics.strategy {
        eprintln!("strategy: {}", strategy);
    }
    eprintln!("duration: {:.3} ms", diagnostics.duration_ms);
    for message in &diagnostics.messages {
        eprintln!("message: {}", message);
    }
}
