//! `kdlreformat`: reads a KDL document and writes it back out in a
//! canonical shape.

use std::fs;
use std::io::{self, Read, Write};

use clap::{Arg, ArgAction, Command};
use miette::IntoDiagnostic;

use kdl_canon::{parse, ParseConfig, PrintConfig};

fn main() -> miette::Result<()> {
    let matches = Command::new("kdlreformat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("KDL parser/printer, letting you easily reformat KDL files into a canonical representation")
        .arg(
            Arg::new("infile")
                .help("Input file. Reads from stdin when omitted.")
                .index(1),
        )
        .arg(
            Arg::new("outfile")
                .help("Output file. Writes to stdout when omitted.")
                .index(2),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_parser(clap::value_parser!(i64))
                .allow_hyphen_values(true)
                .default_value("-1")
                .help("How many spaces for each level of indent. -1 indicates to indent with tabs."),
        )
        .arg(
            Arg::new("semicolons")
                .long("semicolons")
                .action(ArgAction::SetTrue)
                .help("Whether to end nodes with semicolons or not."),
        )
        .arg(
            Arg::new("radix")
                .long("radix")
                .action(ArgAction::SetTrue)
                .overrides_with("no-radix")
                .help("Output numeric values in the radix used by the input. (0x1a outputs as 0x1a)"),
        )
        .arg(
            Arg::new("no-radix")
                .long("no-radix")
                .action(ArgAction::SetTrue)
                .help("Convert all numeric arguments to decimal. (0x1a outputs as 26)"),
        )
        .arg(
            Arg::new("raw-strings")
                .long("raw-strings")
                .action(ArgAction::SetTrue)
                .overrides_with("no-raw-strings")
                .help("Output string values in the string type used by the input."),
        )
        .arg(
            Arg::new("no-raw-strings")
                .long("no-raw-strings")
                .action(ArgAction::SetTrue)
                .help("Convert all string arguments into plain strings."),
        )
        .arg(
            Arg::new("exponent")
                .long("exponent")
                .value_parser(["e", "E"])
                .default_value("e")
                .help("What character to use ('e' or 'E') for indicating exponents on scinot numbers."),
        )
        .get_matches();

    let indent = matches.get_one::<i64>("indent").copied().unwrap_or(-1);
    let print_config = PrintConfig {
        indent: if indent >= 0 {
            " ".repeat(indent as usize)
        } else {
            "\t".into()
        },
        semicolons: matches.get_flag("semicolons"),
        respect_radix: !matches.get_flag("no-radix"),
        respect_string_type: !matches.get_flag("no-raw-strings"),
        exponent: if matches.get_one::<String>("exponent").map(String::as_str) == Some("E") {
            'E'
        } else {
            'e'
        },
        ..Default::default()
    };

    // Reformatting wants the literal tree untouched: no native
    // conversion in either direction.
    let parse_config = ParseConfig::raw();

    let input = match matches.get_one::<String>("infile") {
        Some(path) => fs::read_to_string(path).into_diagnostic()?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
            buffer
        }
    };

    let doc = parse(&input, Some(&parse_config))?;
    let output = doc.print_with(&print_config);

    match matches.get_one::<String>("outfile") {
        Some(path) => fs::write(path, output).into_diagnostic()?,
        None => io::stdout().write_all(output.as_bytes()).into_diagnostic()?,
    }
    Ok(())
}
