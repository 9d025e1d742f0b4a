use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use tabtext::{render, render_text, EngineConfig, TabError};

const USAGE: &str = "Usage: tabtext [options] <input|-> [output]

Options:
  --transpose N    Transpose chords by N half steps
  --width N        Wrap tab blocks at N columns (implies --legacy-wrap)
  --legacy-wrap    Wrap tab blocks at the configured width
  --place          Add chord marker placements (JSON output)
  --config FILE    Read engine options from a YAML file
  --json           Write the rendered document as JSON
  --chords         Only list the distinct chords, one per line
  --verbose        Log debug output (RUST_LOG overrides)";

struct Options {
    input: String,
    output: Option<String>,
    config_path: Option<String>,
    transpose: Option<i32>,
    width: Option<usize>,
    legacy_wrap: bool,
    place: bool,
    json: bool,
    chords_only: bool,
    verbose: bool,
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut positional = Vec::new();
    let mut options = Options {
        input: String::new(),
        output: None,
        config_path: None,
        transpose: None,
        width: None,
        legacy_wrap: false,
        place: false,
        json: false,
        chords_only: false,
        verbose: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--transpose" => {
                let value = iter.next().unwrap_or_else(|| usage_error("--transpose needs a value"));
                options.transpose = Some(value.parse().unwrap_or_else(|_| {
                    usage_error(&format!("Invalid transpose amount '{}'", value))
                }));
            }
            "--width" => {
                let value = iter.next().unwrap_or_else(|| usage_error("--width needs a value"));
                options.width = Some(value.parse().unwrap_or_else(|_| {
                    usage_error(&format!("Invalid width '{}'", value))
                }));
            }
            "--config" => {
                let value = iter.next().unwrap_or_else(|| usage_error("--config needs a file"));
                options.config_path = Some(value.clone());
            }
            "--legacy-wrap" => options.legacy_wrap = true,
            "--place" => options.place = true,
            "--json" => options.json = true,
            "--chords" => options.chords_only = true,
            "--verbose" => options.verbose = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            flag if flag.starts_with("--") => usage_error(&format!("Unknown option '{}'", flag)),
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    options.input = positional
        .next()
        .unwrap_or_else(|| usage_error("Missing input file"));
    options.output = positional.next();
    if positional.next().is_some() {
        usage_error("Too many arguments");
    }
    options
}

fn read_input(path: &str) -> Result<String, TabError> {
    let io_error = |e: io::Error| TabError::IoError {
        path: path.to_string(),
        message: e.to_string(),
    };
    if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map_err(io_error)?;
        Ok(source)
    } else {
        fs::read_to_string(path).map_err(io_error)
    }
}

fn load_config(options: &Options) -> Result<EngineConfig, TabError> {
    let mut config = match &options.config_path {
        Some(path) => EngineConfig::from_yaml(&read_input(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(steps) = options.transpose {
        config.transpose = steps;
    }
    if let Some(width) = options.width {
        config.wrap_width = width;
        config.legacy_wrap = true;
    }
    if options.legacy_wrap {
        config.legacy_wrap = true;
    }
    if options.place {
        config.place_markers = true;
    }
    Ok(config.normalized())
}

fn run(options: &Options) -> Result<String, TabError> {
    let config = load_config(options)?;
    let source = read_input(&options.input)?;
    // Warnings reach stderr through the logger as they are raised.
    let rendered = render(&source, &config);

    let output = if options.chords_only {
        rendered.chords.sorted().join("\n")
    } else if options.json {
        serde_json::to_string_pretty(&rendered).map_err(|e| TabError::IoError {
            path: options.output.clone().unwrap_or_else(|| "<stdout>".to_string()),
            message: e.to_string(),
        })?
    } else {
        render_text(&rendered)
    };
    Ok(output)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let default_level = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let output = match run(&options) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Output
    match &options.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote {} to {}", if options.json { "JSON" } else { "text" }, path);
        }
        None => {
            println!("{}", output);
        }
    }
}
