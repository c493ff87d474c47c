//! pagedb CLI Client
//!
//! Sends statements to a pagedb server and prints the responses.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::process;

use clap::Parser;
use pagedb::protocol::{self, StatementReader};

/// pagedb CLI
#[derive(Parser, Debug)]
#[command(name = "pagedb-cli")]
#[command(about = "CLI for the pagedb storage engine")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8888")]
    server: String,

    /// Execute a single statement and exit; otherwise statements are read from stdin
    #[arg(short, long)]
    execute: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("pagedb-cli: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> io::Result<()> {
    let stream = TcpStream::connect(&args.server)?;
    let mut responses = BufReader::new(stream.try_clone()?);
    let mut requests = BufWriter::new(stream);

    match &args.execute {
        Some(statement) => round_trip(&mut requests, &mut responses, statement),
        None => {
            let mut statements = StatementReader::new(io::stdin().lock());
            loop {
                match statements.next_statement() {
                    Ok(Some(statement)) => round_trip(&mut requests, &mut responses, &statement)?,
                    Ok(None) => return Ok(()),
                    Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e.to_string())),
                }
            }
        }
    }
}

/// Send one statement and print response lines up to the terminal line
///
/// A row that looks like a terminal line stops the read early.
fn round_trip<W: Write, R: BufRead>(writer: &mut W, reader: &mut R, statement: &str) -> io::Result<()> {
    let statement = statement.trim();
    if statement.contains(protocol::TERMINATOR) {
        writeln!(writer, "{}", statement)?;
    } else {
        writeln!(writer, "{}{}", statement, protocol::TERMINATOR)?;
    }
    writer.flush()?;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            ));
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        println!("{}", line);
        if protocol::is_terminal_line(line) {
            return Ok(());
        }
    }
}
