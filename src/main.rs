//! Thyroid Recurrence Prediction CLI
//!
//! Serves the prediction form and runs one-off predictions from the shell.

use clap::{Parser, Subcommand};
use thyroid::{Config, Result};

#[derive(Parser)]
#[command(name = "thyroid")]
#[command(about = "Thyroid cancer recurrence prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the prediction web form
    Serve {
        /// Override the bind address (e.g. 127.0.0.1:8080)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Predict recurrence for one patient
    Predict {
        /// Patient fields as KEY=VALUE (e.g. age=52 risk=High T=T3a)
        fields: Vec<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Print the encoded feature vector for one patient
    Encode {
        /// Patient fields as KEY=VALUE
        fields: Vec<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show model information
    Info,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Serve { bind } => commands::serve(config, bind),
        Commands::Predict { fields, format } => commands::predict(&config, &fields, format),
        Commands::Encode { fields, format } => commands::encode(&fields, format),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
        },
        Commands::Init => commands::init(&cli.config, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use thyroid::features::{encode as encode_record, feature_labels, PatientRecord};
    use thyroid::model::{load_classifier, NetworkClassifier, RecurrenceNetConfig};
    use thyroid::predict::{format_prediction, PredictionOutcome, Predictor};
    use thyroid::ThyroidError;

    /// Parse KEY=VALUE arguments into a record, defaults for the rest
    fn record_from_args(fields: &[String]) -> Result<PatientRecord> {
        let pairs = fields
            .iter()
            .map(|arg| {
                arg.split_once('=')
                    .ok_or_else(|| ThyroidError::Parse(format!("expected KEY=VALUE, got {:?}", arg)))
            })
            .collect::<Result<Vec<_>>>()?;
        PatientRecord::from_pairs(pairs)
    }

    pub fn init(config_path: &str, config: &Config) -> Result<()> {
        config.save(config_path)?;
        println!("Created config at {}", config_path);

        let model_dir = std::path::Path::new(&config.model.path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = model_dir {
            std::fs::create_dir_all(dir)?;
            println!("Created {}/", dir.display());
        }
        std::fs::create_dir_all(&config.server.static_dir)?;
        println!("Created {}/", config.server.static_dir);

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!(
            "  2. Place the trained classifier at {}",
            config.model.artifact_file()
        );
        println!("  3. Run 'thyroid serve' and open the form in a browser");

        Ok(())
    }

    pub fn serve(mut config: Config, bind: Option<String>) -> Result<()> {
        if let Some(bind) = bind {
            config.server.bind = bind;
        }

        let predictor = Predictor::new(load_classifier(&config.model));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(thyroid::web::serve(&config, predictor))
    }

    pub fn predict(config: &Config, fields: &[String], format: OutputFormat) -> Result<()> {
        let record = record_from_args(fields)?;
        let predictor = Predictor::new(load_classifier(&config.model));
        let outcome = predictor.predict(&record);

        match format {
            OutputFormat::Table => {
                print!("{}", format_prediction(&record, &outcome));
            }
            OutputFormat::Json => {
                let recurrence = match &outcome {
                    PredictionOutcome::Label(label) => Some(label.to_string()),
                    _ => None,
                };
                let json = serde_json::json!({
                    "patient": record,
                    "recurrence": recurrence,
                    "message": outcome.to_string(),
                });
                let text = serde_json::to_string_pretty(&json)
                    .map_err(|e| ThyroidError::Parse(e.to_string()))?;
                println!("{}", text);
            }
            OutputFormat::Csv => {
                println!("age,risk,T,N,M,Stage,recurrence");
                println!(
                    "{},{},{},{},{},{},{}",
                    record.age, record.risk, record.t, record.n, record.m, record.stage, outcome
                );
            }
        }

        match outcome {
            PredictionOutcome::Label(_) => Ok(()),
            PredictionOutcome::ModelNotLoaded => Err(ThyroidError::ModelUnavailable),
            PredictionOutcome::Failed(message) => Err(ThyroidError::Prediction(message)),
        }
    }

    pub fn encode(fields: &[String], format: OutputFormat) -> Result<()> {
        let record = record_from_args(fields)?;
        let vector = encode_record(&record);
        let labels = feature_labels();

        match format {
            OutputFormat::Table => {
                println!("Feature Vector ({} values)", vector.as_slice().len());
                println!("───────────────────────────────────────────────");
                for (i, (label, value)) in labels.iter().zip(vector.as_slice()).enumerate() {
                    println!("  {:>2}  {:<44} {}", i, label, value);
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "labels": labels,
                    "values": vector.as_slice(),
                });
                let text = serde_json::to_string_pretty(&json)
                    .map_err(|e| ThyroidError::Parse(e.to_string()))?;
                println!("{}", text);
            }
            OutputFormat::Csv => {
                let quoted: Vec<String> = labels.iter().map(|l| format!("\"{}\"", l)).collect();
                println!("{}", quoted.join(","));
                let values: Vec<String> = vector.as_slice().iter().map(|v| v.to_string()).collect();
                println!("{}", values.join(","));
            }
        }

        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let artifact = config.model.artifact_file();
        let net_config = RecurrenceNetConfig::from_model_config(&config.model);

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:          {}", artifact);
        println!("  Input dim:     {}", net_config.input_dim);
        println!("  Hidden layers: {:?}", net_config.hidden_dims);
        println!("  Threshold:     {}", config.model.threshold);

        match NetworkClassifier::load(&config.model) {
            Ok(_) => {
                println!("  Status:        loaded");
                Ok(())
            }
            Err(e) => {
                println!("  Status:        not loaded");
                Err(e)
            }
        }
    }
}
