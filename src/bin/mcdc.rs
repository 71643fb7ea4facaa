use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::eyre;

use mcdc_rs::analysis::Analysis;
use mcdc_rs::config::{AnalysisConfig, Strategy};
use mcdc_rs::render::{PairsDisplay, RenderConfig, SelectionDisplay, TableDisplay};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for simplelog::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => simplelog::LevelFilter::Off,
            LogLevel::Error => simplelog::LevelFilter::Error,
            LogLevel::Warn => simplelog::LevelFilter::Warn,
            LogLevel::Info => simplelog::LevelFilter::Info,
            LogLevel::Debug => simplelog::LevelFilter::Debug,
            LogLevel::Trace => simplelog::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "MCDC test case generator")]
struct Cli {
    /// Decision expressions, e.g. "(A and B) or not C".
    /// Without expressions, reads them interactively from stdin.
    #[arg(value_name = "EXPR")]
    expressions: Vec<String>,

    /// Maximum number of conditions (the truth table has `2^n` rows).
    #[arg(long, value_name = "INT", default_value = "16")]
    max_conditions: usize,

    /// Test set selection strategy: greedy or exact.
    #[arg(long, value_name = "STRATEGY", default_value = "exact")]
    strategy: Strategy,

    /// Largest condition count for which the exact search is attempted.
    #[arg(long, value_name = "INT", default_value = "8")]
    exact_threshold: usize,

    /// Render booleans as 1/0.
    #[arg(long)]
    numeric: bool,

    /// Log level.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

impl Cli {
    fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig::default()
            .with_max_conditions(self.max_conditions)
            .with_strategy(self.strategy)
            .with_exact_threshold(self.exact_threshold)
    }

    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            numeric: self.numeric,
            ..RenderConfig::default()
        }
    }
}

/// Prints the full report for one expression. Returns `false` if the expression was rejected.
fn report(expression: &str, config: &AnalysisConfig, render: &RenderConfig) -> bool {
    let rule = "-".repeat(60);
    println!("{}", rule);
    println!("Analyzing Requirement: {}", expression);
    println!("{}", rule);

    let analysis = match Analysis::run(expression, config) {
        Ok(analysis) => analysis,
        Err(e) => {
            println!("\nInput Error: {}", e);
            println!("{}", rule);
            return false;
        }
    };

    println!("\nIdentified Conditions: {:?}", analysis.conditions());
    println!("\nFull Truth Table (Decision Table):");
    print!("{}", TableDisplay::new(analysis.table(), render));
    println!("{}", "-".repeat(30));

    println!("\nMCDC Independence Pairs Found (Row Index Pairs):");
    print!("{}", PairsDisplay::new(analysis.pairs()));
    println!("{}", "-".repeat(30));

    println!();
    print!("{}", SelectionDisplay::new(analysis.selection()));
    if analysis.selection().is_complete() {
        println!("\nTruth Table with Selected MCDC Test Cases Highlighted:");
        print!(
            "{}",
            TableDisplay::new(analysis.table(), render).with_selection(analysis.selection())
        );
    }
    println!("{}", rule);
    true
}

fn interactive(config: &AnalysisConfig, render: &RenderConfig) -> io::Result<()> {
    println!("=============================================");
    println!(" MCDC Test Case Generator Tool ");
    println!("=============================================");
    println!("Enter boolean expressions using and, or, not and parentheses.");
    println!("Example: (A and B) or (C and not D)");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nEnter requirement expression (or type 'quit' to exit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nExiting.");
            break;
        };
        let line = line?;
        let expression = line.trim();
        if expression.eq_ignore_ascii_case("quit") {
            break;
        }
        if expression.is_empty() {
            println!("Please enter an expression.");
            continue;
        }
        report(expression, config, render);
    }

    println!("\nTool finished.");
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level.into(),
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    log::debug!("args = {:?}", args);

    let config = args.analysis_config();
    let render = args.render_config();

    if args.expressions.is_empty() {
        interactive(&config, &render)?;
        return Ok(());
    }

    let failed = args
        .expressions
        .iter()
        .filter(|expression| !report(expression, &config, &render))
        .count();
    if failed > 0 {
        return Err(eyre!("{} of {} expressions were rejected", failed, args.expressions.len()));
    }

    Ok(())
}
