use anyhow::{Context, Result};
use clap::Parser;
use pitchseq::{
    cli::{Cli, OutputFormat},
    comparison::{compare_transitions, CaseTotals, ComparisonConfig},
    csv_output::CsvOutput,
    json_output::JsonOutput,
    pitch::{build_outcome_logs, load_pitch_log, LogOptions},
    saber::SaberSummary,
    transition::estimate_transitions,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Config file (or defaults) with CLI overrides applied
fn load_config(args: &Cli) -> Result<ComparisonConfig> {
    let mut config = match &args.config {
        Some(path) => ComparisonConfig::from_toml(path)?,
        None => ComparisonConfig::default(),
    };

    if let Some(k) = args.top_k {
        config.report_top_k = k;
    }
    if let Some(critical_value) = args.critical_value {
        config.critical_value = critical_value;
    }
    if let Some(p) = args.min_probability {
        config.min_report_probability = p;
    }

    config.validate()?;
    Ok(config)
}

fn log_options(args: &Cli) -> LogOptions {
    let sentinel = |label: &str| (!args.no_sentinels).then(|| label.to_string());
    LogOptions {
        start_label: sentinel(&args.start_label),
        end_label: sentinel(&args.end_label),
        exclude_pitch_types: args.exclude_pitch.clone(),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if !args.fip_constant.is_finite() {
        anyhow::bail!("Invalid value for --fip-constant: {}", args.fip_constant);
    }

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let records = load_pitch_log(&args.input)?;
    let logs = build_outcome_logs(&records, &log_options(&args))?;

    let out = estimate_transitions(&logs.out).context("No at-bats ended in an out")?;
    let reach = estimate_transitions(&logs.reach)
        .context("No at-bats ended with the batter on base")?;

    let comparison = compare_transitions(
        &out.probabilities,
        &reach.probabilities,
        Some((&out.counts, &reach.counts)),
        &config,
    );

    // Rate stats cover the same at-bats the transition models saw
    let saber = args.saber.then(|| {
        SaberSummary::from_records(&logs.retained_records(&records), args.fip_constant)
    });

    match args.format {
        OutputFormat::Text => {
            let totals = CaseTotals {
                out: out.cases,
                reach: reach.cases,
            };
            print!("{}", comparison.to_report_string(&config, Some(totals)));
            if let Some(saber) = saber {
                print!("{}", saber.to_report_string());
            }
        }
        OutputFormat::Json => {
            let mut output = JsonOutput::new(out, reach, comparison);
            output.set_excluded(logs.other, logs.dropped);
            if let Some(saber) = saber {
                output.set_saber(saber);
            }
            println!("{}", output.to_json()?);
        }
        OutputFormat::Csv => {
            let mut output = CsvOutput::new();
            output.add_model("out", &out, config.min_report_probability);
            output.add_model("reach", &reach, config.min_report_probability);
            print!("{}", output.to_csv());
        }
    }

    Ok(())
}
