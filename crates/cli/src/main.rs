use clap::{Parser, Subcommand};
use docstore_core::{
    core_config_from_env_values, DocumentRecord, DocumentService, MetadataStore, OrphanReport,
};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docstore")]
#[command(about = "Docstore document store admin CLI")]
struct Cli {
    /// Directory holding stored PDFs
    #[arg(long, env = "DOCSTORE_UPLOAD_DIR", global = true)]
    upload_dir: Option<String>,

    /// Path of the metadata store
    #[arg(long, env = "DOCSTORE_METADATA_FILE", global = true)]
    metadata_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all document records
    List,
    /// Show the records for one file identifier
    Show {
        /// File identifier (as listed by `list`)
        file_path: String,
    },
    /// Report records without a stored file and stored files without a record
    Orphans,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = core_config_from_env_values(cli.upload_dir, cli.metadata_file)?;

    match cli.command {
        Some(Commands::List) => {
            let store = MetadataStore::new(cfg.metadata_file());
            if !store.exists() {
                println!("No documents found.");
                return Ok(ExitCode::SUCCESS);
            }
            for record in store.load()? {
                println!("{}", format_record(&record));
            }
        }
        Some(Commands::Show { file_path }) => {
            let records = MetadataStore::new(cfg.metadata_file()).find(&file_path)?;
            if records.is_empty() {
                eprintln!("No record for {}", file_path);
                return Ok(ExitCode::FAILURE);
            }
            for record in records {
                println!("{}", format_record(&record));
            }
        }
        Some(Commands::Orphans) => {
            let report = DocumentService::new(&cfg)?.find_orphans()?;
            print!("{}", format_orphans(&report));
            if !report.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        None => {
            println!("Use 'docstore --help' for commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn format_record(record: &DocumentRecord) -> String {
    format!(
        "ID: {}, Name: {}, Uploaded: {}",
        record.file_path, record.name, record.date
    )
}

fn format_orphans(report: &OrphanReport) -> String {
    if report.is_empty() {
        return "No orphans found.\n".to_string();
    }

    let mut out = String::new();
    for record in &report.records_without_file {
        out.push_str(&format!("record without file: {}\n", format_record(record)));
    }
    for id in &report.files_without_record {
        out.push_str(&format!("file without record: {}\n", id));
    }
    out
}
