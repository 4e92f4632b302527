use std::path::{Path, PathBuf};

use clap::Parser;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use mobhealth_core::{
    CreatureRecord, ExtractConfig, ExtractStats, HealthExtractor, DEFAULT_TABLE, DEFAULT_VARIABLE,
};

#[derive(Parser)]
#[command(
    name = "mobhealth",
    version,
    about = "Prefill a MobHealth3 health table from a creature_template dump"
)]
struct Cli {
    /// Path to a .sql dump, or a .7z archive containing one
    input: PathBuf,

    /// Output file
    #[arg(long, short = 'o', default_value = "MobHealth.lua")]
    output: PathBuf,

    /// Source table holding creature definitions
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Name of the generated table variable
    #[arg(long, default_value = DEFAULT_VARIABLE)]
    var_name: String,

    /// Print run statistics as JSON
    #[arg(long)]
    json: bool,

    /// List extracted creatures instead of writing the output file
    #[arg(long)]
    dry_run: bool,

    /// Limit number of creatures listed by --dry-run
    #[arg(long, requires = "dry_run")]
    limit: Option<usize>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> mobhealth_core::Result<()> {
    let config = ExtractConfig {
        table: cli.table,
        variable_name: cli.var_name,
    };
    log::debug!("Reading `{}` from {}", config.table, cli.input.display());
    let extractor = HealthExtractor::new(config);

    if cli.dry_run {
        return cmd_dry_run(&extractor, &cli.input, cli.limit, cli.json);
    }

    let stats = extractor.run(&cli.input, &cli.output)?;
    if cli.json {
        println!("{}", stats.to_json()?);
    } else {
        println!("Wrote {}", cli.output.display());
        print_stats(&stats);
    }
    Ok(())
}

fn cmd_dry_run(
    extractor: &HealthExtractor,
    input: &Path,
    limit: Option<usize>,
    json: bool,
) -> mobhealth_core::Result<()> {
    let result = extractor.extract_file(input)?;
    let mut stats = result.stats;
    stats.entries_written = 0;

    if json {
        println!("{}", stats.to_json()?);
        return Ok(());
    }

    if result.records.is_empty() {
        println!("No rows found in `{}`.", extractor.config().table);
    } else {
        let shown = limit.unwrap_or(result.records.len()).min(result.records.len());
        println!("{}", creature_table(&result.records[..shown]));
        if shown < result.records.len() {
            println!("... {} more", result.records.len() - shown);
        }
    }
    print_stats(&stats);
    Ok(())
}

fn creature_table(records: &[CreatureRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Levels", "Health", "Entries"]);

    for r in records {
        table.add_row(vec![
            r.name.clone(),
            format!("{}-{}", r.min_level, r.max_level),
            format!("{}-{}", r.min_health, r.max_health),
            r.level_count().to_string(),
        ]);
    }
    table
}

fn print_stats(stats: &ExtractStats) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Stat", "Value"]);

    table.add_row(vec!["Bytes read".to_string(), stats.bytes_read.to_string()]);
    table.add_row(vec!["Bytes retained".to_string(), stats.bytes_retained.to_string()]);
    table.add_row(vec!["Statements parsed".to_string(), stats.statements_parsed.to_string()]);
    if stats.statements_skipped > 0 {
        table.add_row(vec!["Statements skipped".to_string(), stats.statements_skipped.to_string()]);
    }
    table.add_row(vec!["Creatures".to_string(), stats.creatures.to_string()]);
    table.add_row(vec!["Entries written".to_string(), stats.entries_written.to_string()]);

    println!("{table}");
}
