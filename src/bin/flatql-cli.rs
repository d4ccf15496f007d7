//! flatql interactive shell
//!
//! Usage: `flatql-cli [config.json]`. Each input line is one or more
//! `;`-separated statements.

use anyhow::Context;
use flatql::{DBConfig, Database, SchemaCatalog, SelectResult};
use std::env;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = match args.get(1).map(String::as_str) {
        None => DBConfig::default(),
        Some("--version" | "-v") => {
            println!("flatql v{}", VERSION);
            return Ok(());
        }
        Some("--help" | "-h") => {
            print_help();
            return Ok(());
        }
        Some(path) => DBConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
    };

    let db = Database::open(config).context("failed to open database")?;
    interactive_mode(&db)
}

fn print_help() {
    println!(
        r#"
flatql v{} - SQL subset over fixed-width table files

Usage:
  flatql-cli                 start the shell (data in ./databases/default)
  flatql-cli <config.json>   start the shell with a JSON config
  flatql-cli --version       print version
  flatql-cli --help          print this help

Config keys: data_dir, database, chunk_size, catalog_path
Log level: RUST_LOG (default: warn)
"#,
        VERSION
    );
}

fn interactive_mode(db: &Database) -> anyhow::Result<()> {
    println!("flatql v{}", VERSION);
    println!("Database: {}", db.config().database_dir().display());
    println!("Type '.help' for help, '.exit' to quit\n");

    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("flatql> ");
        io::stdout().flush()?;

        buffer.clear();
        if stdin.lock().read_line(&mut buffer)? == 0 {
            break;
        }

        let input = buffer.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('.') {
            match input {
                ".exit" | ".quit" => break,
                ".help" => print_interactive_help(),
                ".tables" => list_tables(db),
                ".schema" => {
                    for table in db.catalog().list_tables() {
                        show_table_schema(db, &table);
                    }
                }
                cmd if cmd.starts_with(".schema ") => show_table_schema(db, cmd[8..].trim()),
                _ => eprintln!("Unknown command: {} (try '.help')", input),
            }
            continue;
        }

        match db.execute(input) {
            Ok(results) => results.iter().for_each(display_result),
            Err(e) if e.is_validation() => eprintln!("Invalid statement: {}", e),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn display_result(result: &SelectResult) {
    if result.rows.is_empty() {
        println!("No results");
    } else {
        display_table(&result.columns, &result.value_rows());
    }

    if result.truncated {
        println!(
            "Note: table is larger than one chunk; more rows start at byte {}",
            result.resume_offset.unwrap_or_default()
        );
    }
}

fn display_table(columns: &[String], rows: &[Vec<flatql::Value>]) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        println!("{}{}{}", left, parts.join(mid), right);
    };
    let line = |values: &[String]| {
        let parts: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!(" {:w$} ", v, w = *w))
            .collect();
        println!("│{}│", parts.join("│"));
    };

    rule("┌", "┬", "┐");
    line(columns);
    rule("├", "┼", "┤");
    for row in &cells {
        line(row.as_slice());
    }
    rule("└", "┴", "┘");

    println!("{} row(s) returned", rows.len());
}

fn print_interactive_help() {
    println!(
        r#"
Commands:
  .help              show this help
  .exit, .quit       leave the shell
  .tables            list tables
  .schema            show every table's columns
  .schema <table>    show one table's columns

Statements:
  SELECT * FROM User;
  SELECT id, age FROM User WHERE age > 20;
  SELECT name FROM Person WHERE surname = 'Babitskiy';

Operators: =  !=  <  >
INSERT, DELETE, CREATE, ALTER and DROP are recognised but not implemented.
"#
    );
}

fn list_tables(db: &Database) {
    let tables = db.catalog().list_tables();
    if tables.is_empty() {
        println!("No tables found");
    } else {
        for table in tables {
            println!("  {}", table);
        }
    }
}

fn show_table_schema(db: &Database, table: &str) {
    let schema = match db.schema(table) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    println!("Table: {} ({} bytes per row)", schema.name, schema.row_byte_size());
    for column in schema.columns() {
        let offset = schema.offset_of(&column.name).unwrap_or_default();
        println!("  {:16} {:10} @{}", column.name, column.field_type.to_string(), offset);
    }
}
