//! Command-line schema inspector: compiles a schema document and prints a
//! summary of the resulting model.

use clap::Parser;
use std::process::ExitCode;
use xsdreader::schema::{ElementNode, TypeNode};
use xsdreader::SchemaReader;

#[derive(Parser)]
#[command(name = "xsdreader", version, about = "Compile an XSD document and summarize the schema model")]
struct Args {
    /// Path to the schema document
    schema: String,

    /// Also list facet checks on restricted simple types
    #[arg(long)]
    facets: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> xsdreader::Result<()> {
    let mut reader = SchemaReader::new();
    let root = reader.read_file(&args.schema)?;
    let set = reader.schema_set();
    let schema = set.schema(root);

    println!("schema: {}", args.schema);
    println!(
        "target namespace: {}",
        schema.target_namespace().unwrap_or("(none)")
    );

    for (name, &type_id) in schema.types() {
        let ty = set.type_node(type_id);
        let kind = match ty {
            TypeNode::Simple(_) => "simpleType",
            TypeNode::Complex(_) => "complexType",
            TypeNode::ComplexSimpleContent(_) => "complexType (simpleContent)",
        };
        println!("  type {} ({})", name, kind);
        if args.facets {
            if let Some(restriction) = ty.restriction() {
                for (facet, checks) in restriction.checks() {
                    for check in checks {
                        println!("    {} = {}", facet.as_str(), check.value);
                    }
                }
            }
        }
    }

    for (name, &element_id) in schema.elements() {
        let type_name = set
            .element_type(element_id)
            .and_then(|t| set.type_node(t).name().map(str::to_string))
            .unwrap_or_else(|| "(anonymous)".to_string());
        println!("  element {}: {}", name, type_name);
    }

    for (name, &group_id) in schema.groups() {
        let members = match set.element_node(group_id) {
            ElementNode::Group(g) => g.elements().len(),
            _ => set.group_elements(group_id).len(),
        };
        println!("  group {} ({} particles)", name, members);
    }

    Ok(())
}
