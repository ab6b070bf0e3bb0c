use std::io::Write;
use std::time::Duration;

use clap::{ArgAction, Parser};
use rdfhash::{Credentials, GraphDigest, RdfFormat, Source, SourceLoader};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "rdfhash",
    version,
    about = "Print a stable SHA-256 digest of an RDF graph."
)]
pub struct Args {
    /// File path or http(s) URL of the RDF document
    #[arg(short, long)]
    pub source: String,

    /// Base IRI for resolving relative IRIs
    #[arg(short, long)]
    pub base: Option<String>,

    /// Syntax of the document (TURTLE, N-TRIPLES, RDF/XML, ...)
    #[arg(short, long)]
    pub format: Option<RdfFormat>,

    /// Username for HTTP basic auth
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password for HTTP basic auth
    #[arg(short, long)]
    pub password: Option<String>,

    /// Print the canonical string before the digest
    #[arg(short, long)]
    pub debug: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Timeout in seconds for remote sources
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Raise log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    fn loader(&self) -> Result<SourceLoader, CliError> {
        let credentials = Credentials::from_parts(self.username.clone(), self.password.clone())
            .map_err(CliError::InvalidOptions)?;

        let mut loader = SourceLoader::new();
        if let Some(base) = &self.base {
            loader = loader.with_base_iri(base.clone());
        }
        if let Some(format) = self.format {
            loader = loader.with_format(format);
        }
        if let Some(credentials) = credentials {
            loader = loader.with_credentials(credentials);
        }
        if let Some(secs) = self.timeout {
            loader = loader.with_timeout(Duration::from_secs(secs));
        }
        Ok(loader)
    }
}

/// Loads the requested graph and writes its digest to `out`.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    let loader = args.loader()?;
    let source = Source::parse(&args.source)?;
    let graph = loader.load(&source)?;

    let computed = GraphDigest::compute(&graph);
    log::info!(
        "{} triples from {} hashed to {}",
        computed.triples,
        source,
        computed.digest
    );

    if args.json {
        let mut value = serde_json::to_value(&computed)?;
        if !args.debug {
            if let Some(object) = value.as_object_mut() {
                object.remove("canonical");
            }
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        if args.debug {
            writeln!(out, "{}", computed.canonical)?;
        }
        writeln!(out, "{}", computed.digest)?;
    }

    Ok(())
}
