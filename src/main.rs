mod config;
mod error;
mod telemetry;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, Utc};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use credit_rules::compliance::{
    parse_csv, BatchIssue, BatchValidationResult, BatchValidator, ComplianceEngine, CustomerType,
    LendingLimitValidator, LoanRequest,
};
use credit_rules::features::{FeatureRequestBuilder, RequestContext};
use credit_rules::resolution::{FieldResolver, ResolutionInputs, SystemContext};
use credit_rules::rules::{
    rule_preview, to_graph, GraphValidation, RuleDefinition, RuleEditor, RuleGraph,
};
use credit_rules::FieldMap;

use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "credit-console",
    about = "Author credit rules, validate loan applications and build scoring payloads",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert, validate, preview and test decision rules
    Rule {
        #[command(subcommand)]
        command: RuleCommand,
    },
    /// Validate a branch CSV upload of loan applications
    Batch {
        #[command(subcommand)]
        command: BatchCommand,
    },
    /// Run the lending compliance checks
    Compliance {
        #[command(subcommand)]
        command: ComplianceCommand,
    },
    /// Build scoring service payloads
    Features {
        #[command(subcommand)]
        command: FeaturesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RuleCommand {
    /// Print the editor graph for a rule JSON file
    Graph { rule: PathBuf },
    /// Validate an editor graph; exits non-zero when it cannot be saved
    Check { graph: PathBuf },
    /// Print the human-readable preview of a rule
    Preview { rule: PathBuf },
    /// Evaluate a rule against a JSON map of applicant fields
    Test { rule: PathBuf, facts: PathBuf },
}

#[derive(Subcommand, Debug)]
enum BatchCommand {
    /// Validate every row of an upload
    Validate(BatchValidateArgs),
}

#[derive(Args, Debug)]
struct BatchValidateArgs {
    csv: PathBuf,
    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum ComplianceCommand {
    /// Check a flat JSON map of application fields
    Check { application: PathBuf },
    /// Check a loan request against central bank lending limits
    Limits(LimitsArgs),
}

#[derive(Args, Debug)]
struct LimitsArgs {
    loan: PathBuf,
    /// individual or business
    #[arg(long, value_parser = parse_customer_type, default_value = "individual")]
    customer_type: CustomerType,
}

#[derive(Subcommand, Debug)]
enum FeaturesCommand {
    /// Resolve an application and print the scoring request
    Build(FeaturesBuildArgs),
}

#[derive(Args, Debug)]
struct FeaturesBuildArgs {
    /// JSON with formData and optional customerData, systemData, autoFetchedData
    inputs: PathBuf,
    #[arg(long)]
    request_id: String,
    #[arg(long)]
    correlation_id: String,
    /// Capture time (RFC 3339); defaults to now
    #[arg(long, value_parser = parse_timestamp)]
    timestamp: Option<DateTime<FixedOffset>>,
    /// Channel recorded when the inputs carry no system data
    #[arg(long)]
    channel: Option<String>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(?config.environment, "credit console started");

    match cli.command {
        Command::Rule { command } => run_rule(command),
        Command::Batch {
            command: BatchCommand::Validate(args),
        } => run_batch(args, &config),
        Command::Compliance { command } => run_compliance(command, &config),
        Command::Features {
            command: FeaturesCommand::Build(args),
        } => run_features(args),
    }
}

fn parse_customer_type(raw: &str) -> Result<CustomerType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "individual" => Ok(CustomerType::Individual),
        "business" => Ok(CustomerType::Business),
        other => Err(format!(
            "unknown customer type '{other}', expected individual or business"
        )),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_rule(command: RuleCommand) -> Result<(), AppError> {
    match command {
        RuleCommand::Graph { rule } => {
            let rule: RuleDefinition = read_json(&rule)?;
            print_json(&to_graph(&rule))
        }
        RuleCommand::Check { graph } => {
            let raw: serde_json::Value = read_json(&graph)?;
            let graph = match serde_json::from_value::<RuleGraph>(raw) {
                Ok(graph) => graph,
                Err(err) => {
                    print_json(&GraphValidation::Invalid(vec![err.to_string()]).report())?;
                    return Err(err.into());
                }
            };
            let editor = RuleEditor::from_graph(graph);
            print_json(&editor.validation().report())?;
            let rule = editor.save()?;
            info!(rule = rule.name(), "graph is valid");
            Ok(())
        }
        RuleCommand::Preview { rule } => {
            let rule: RuleDefinition = read_json(&rule)?;
            println!("{}", rule_preview(&rule));
            Ok(())
        }
        RuleCommand::Test { rule, facts } => {
            let rule: RuleDefinition = read_json(&rule)?;
            let facts: FieldMap = read_json(&facts)?;
            let evaluation = RuleEditor::load(&rule).test(&facts)?;
            print_json(&evaluation)
        }
    }
}

fn run_batch(args: BatchValidateArgs, config: &AppConfig) -> Result<(), AppError> {
    let file = File::open(&args.csv).map_err(|source| AppError::Input {
        path: args.csv.clone(),
        source,
    })?;
    let parsed = parse_csv(file)?;
    let result = BatchValidator::new(ComplianceEngine::new(config.compliance)).validate(&parsed);

    if args.json {
        print_json(&result)
    } else {
        render_batch(&result);
        Ok(())
    }
}

fn render_batch(result: &BatchValidationResult) {
    println!("{}", result.summary());
    render_issues("Errors", &result.errors);
    render_issues("Warnings", &result.warnings);
}

fn render_issues(title: &str, issues: &[BatchIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("\n{title}");
    for issue in issues {
        let location = if issue.row == 0 {
            "file".to_string()
        } else {
            format!("row {}", issue.row)
        };
        println!("- {location} [{}]: {}", issue.field, issue.message);
    }
}

fn run_compliance(command: ComplianceCommand, config: &AppConfig) -> Result<(), AppError> {
    match command {
        ComplianceCommand::Check { application } => {
            let fields: FieldMap = read_json(&application)?;
            let result = ComplianceEngine::new(config.compliance).evaluate(&fields);
            print_json(&result)
        }
        ComplianceCommand::Limits(args) => {
            let request: LoanRequest = read_json(&args.loan)?;
            let report = LendingLimitValidator::default().report(&request, args.customer_type);
            print_json(&report)
        }
    }
}

fn run_features(args: FeaturesBuildArgs) -> Result<(), AppError> {
    let mut inputs: ResolutionInputs = read_json(&args.inputs)?;
    let captured_at: DateTime<FixedOffset> = match args.timestamp {
        Some(timestamp) => timestamp,
        None => Local::now().into(),
    };

    if inputs.system_data.is_none() {
        let mut system = SystemContext::new(captured_at);
        if let Some(channel) = args.channel {
            system = system.with_channel(channel);
        }
        inputs.system_data = Some(system.into_system_data());
    }

    let resolver = FieldResolver::standard();
    let fallbacks = resolver.fallback_warnings(&inputs);
    if !fallbacks.is_empty() {
        warn!(count = fallbacks.len(), "required fields used fallback defaults");
    }

    let context = RequestContext::new(
        args.request_id,
        args.correlation_id,
        captured_at.with_timezone(&Utc),
    );
    let request = FeatureRequestBuilder::new(resolver).build(&inputs, &context);
    print_json(&request)
}
