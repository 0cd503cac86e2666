//! # FastUtf CLI - Unicode Encoding Converter
//!
//! Command-line interface for converting, detecting and validating
//! ASCII/UTF-8/UTF-16/UTF-32 data and inspecting code point properties.

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;
#[cfg(feature = "cli")]
use tracing::{debug, info};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use fast_utf::{CaseClass, Encoding, PropertyTable, Translator, UnicodeTable};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// FastUtf: Unicode encoding converter
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "fast-utf")]
#[command(version, about, long_about = None)]
#[command(author = "FastUtf Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert files between character encodings
    Convert(ConvertArgs),

    /// Detect encoding of input files
    Detect(DetectArgs),

    /// Validate that a file is properly encoded
    Validate(ValidateArgs),

    /// Count the code points in a file
    Length(LengthArgs),

    /// List all supported encodings
    List,

    /// Display detailed information about an encoding
    Info(InfoArgs),

    /// Show the properties of code points
    Classify(ClassifyArgs),
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ConvertArgs {
    /// Source encoding ("auto" to detect)
    #[arg(short = 'f', long = "from")]
    from: EncodingArg,

    /// Target encoding
    #[arg(short = 't', long = "to")]
    to: EncodingArg,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert in-place (overwrite input file)
    #[arg(long, conflicts_with = "output", requires = "input")]
    in_place: bool,

    /// Add BOM to output
    #[arg(long)]
    add_bom: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct DetectArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ValidateArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Expected encoding
    #[arg(short, long)]
    encoding: EncodingArg,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct LengthArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Encoding of the input
    #[arg(short, long)]
    encoding: EncodingArg,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct InfoArgs {
    /// Encoding to describe
    encoding: EncodingArg,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ClassifyArgs {
    /// Code points: U+00E9, 0xE9, 233, or a single character.
    /// A lone character is always taken literally, so "7" is U+0037;
    /// write U+0007 or 0x7 for the control code.
    #[arg(required = true)]
    code_points: Vec<CodePointArg>,
}

#[cfg(feature = "cli")]
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug)]
enum EncodingArg {
    Auto,
    Encoding(Encoding),
}

#[cfg(feature = "cli")]
impl EncodingArg {
    fn concrete(self) -> Result<Encoding> {
        match self {
            EncodingArg::Encoding(encoding) => Ok(encoding),
            EncodingArg::Auto => anyhow::bail!("\"auto\" is only accepted as a source encoding"),
        }
    }
}

#[cfg(feature = "cli")]
impl std::str::FromStr for EncodingArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let encoding = match s.to_uppercase().as_str() {
            "AUTO" => return Ok(EncodingArg::Auto),
            "ASCII" | "US-ASCII" => Encoding::ASCII,
            "UTF8" | "UTF-8" => Encoding::UTF8,
            "UTF16BE" | "UTF-16BE" => Encoding::UTF16BE,
            "UTF16LE" | "UTF-16LE" => Encoding::UTF16LE,
            "UTF32BE" | "UTF-32BE" => Encoding::UTF32BE,
            "UTF32LE" | "UTF-32LE" => Encoding::UTF32LE,
            _ => anyhow::bail!("Unknown encoding: {}", s),
        };

        Ok(EncodingArg::Encoding(encoding))
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug)]
struct CodePointArg(u32);

#[cfg(feature = "cli")]
impl std::str::FromStr for CodePointArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix("U+")
            .or_else(|| s.strip_prefix("u+"))
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"));

        let mut chars = s.chars();
        let value = if let Some(digits) = hex {
            u32::from_str_radix(digits, 16)
                .with_context(|| format!("Invalid hexadecimal code point: {}", s))?
        } else if let (Some(ch), None) = (chars.next(), chars.next()) {
            ch as u32
        } else {
            s.parse::<u32>()
                .with_context(|| format!("Invalid code point: {}", s))?
        };

        Ok(CodePointArg(value))
    }
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ConversionReport {
    success: bool,
    from: &'static str,
    to: &'static str,
    bytes_processed: usize,
    bytes_written: usize,
    processing_time_ms: u64,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct DetectionReport {
    detected_encoding: &'static str,
    encoding_id: u8,
    bom_detected: bool,
    sample_size: usize,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct EncodingInfo {
    name: &'static str,
    id: u8,
    unit_size: Option<usize>,
    multibyte: bool,
    bom: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct CodePointReport {
    code_point: String,
    alphabetic: bool,
    case: Option<CaseClass>,
    numeric: bool,
    whitespace: bool,
    newline: bool,
    upper: String,
    lower: String,
    title: String,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(ref args) => convert_command(args, &cli)?,
        Commands::Detect(ref args) => detect_command(args, &cli)?,
        Commands::Validate(ref args) => validate_command(args, &cli)?,
        Commands::Length(ref args) => length_command(args, &cli)?,
        Commands::List => list_command(&cli)?,
        Commands::Info(ref args) => info_command(args, &cli)?,
        Commands::Classify(ref args) => classify_command(args, &cli)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(input_path) = input {
        debug!(path = %input_path.display(), "reading input file");
        fs::read(input_path)
            .with_context(|| format!("Failed to read input file: {}", input_path.display()))
    } else {
        debug!("reading from stdin");
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    }
}

#[cfg(feature = "cli")]
fn format_code_point(code_point: u32) -> String {
    format!("U+{:04X}", code_point)
}

#[cfg(feature = "cli")]
fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let start_time = std::time::Instant::now();

    let input_data = read_input(args.input.as_deref())?;

    let from_encoding = match args.from {
        EncodingArg::Encoding(encoding) => encoding,
        EncodingArg::Auto => {
            let detected = fast_utf::detect_encoding(&input_data);
            info!(encoding = %detected, "detected source encoding");
            detected
        }
    };
    let to_encoding = args.to.concrete()?;

    info!(from = %from_encoding, to = %to_encoding, "converting");

    let translator = Translator::new(from_encoding, to_encoding)
        .with_context(|| {
            format!(
                "Failed to create translator from {} to {}",
                from_encoding, to_encoding
            )
        })?
        .with_bom(args.add_bom);

    let output_data = translator
        .convert(&input_data)
        .context("Conversion failed")?;

    // Write output
    let in_place_target = args.input.as_ref().filter(|_| args.in_place);
    if let Some(input_path) = in_place_target {
        fs::write(input_path, &output_data).with_context(|| {
            format!("Failed to write to input file: {}", input_path.display())
        })?;
        info!(path = %input_path.display(), "updated file in-place");
    } else if let Some(ref output_path) = args.output {
        fs::write(output_path, &output_data)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
        info!(path = %output_path.display(), "wrote output");
    } else {
        io::stdout()
            .write_all(&output_data)
            .context("Failed to write to stdout")?;
    }

    let processing_time = start_time.elapsed();
    info!(
        bytes_in = input_data.len(),
        bytes_out = output_data.len(),
        elapsed = ?processing_time,
        "conversion finished"
    );

    match cli.format {
        OutputFormat::Json => {
            let report = ConversionReport {
                success: true,
                from: from_encoding.name(),
                to: to_encoding.name(),
                bytes_processed: input_data.len(),
                bytes_written: output_data.len(),
                processing_time_ms: processing_time.as_millis() as u64,
            };
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if cli.verbose || args.output.is_some() {
                eprintln!("✓ Conversion completed successfully");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn detect_command(args: &DetectArgs, cli: &Cli) -> Result<()> {
    let data = read_input(args.input.as_deref())?;
    let detection = fast_utf::detect(&data);

    match cli.format {
        OutputFormat::Json => {
            let report = DetectionReport {
                detected_encoding: detection.encoding.name(),
                encoding_id: detection.encoding.id(),
                bom_detected: detection.bom_detected(),
                sample_size: data.len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Detected encoding: {}", detection.encoding);
            println!(
                "BOM detected: {}",
                if detection.bom_detected() { "Yes" } else { "No" }
            );
            println!("Sample size: {} bytes", data.len());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn validate_command(args: &ValidateArgs, _cli: &Cli) -> Result<()> {
    let encoding = args.encoding.concrete()?;
    let input_data = read_input(args.input.as_deref())?;

    if fast_utf::is_valid(&input_data, encoding) {
        println!("✓ File is valid {}", encoding);
        std::process::exit(0);
    } else {
        println!("✗ File is not valid {}", encoding);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn length_command(args: &LengthArgs, cli: &Cli) -> Result<()> {
    let encoding = args.encoding.concrete()?;
    let input_data = read_input(args.input.as_deref())?;
    let length = fast_utf::get_length(&input_data, encoding)
        .with_context(|| format!("Input is not valid {}", encoding))?;

    match cli.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "encoding": encoding.name(),
                "bytes": input_data.len(),
                "code_points": length,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => println!("{}", length),
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn encoding_info(encoding: Encoding) -> EncodingInfo {
    EncodingInfo {
        name: encoding.name(),
        id: encoding.id(),
        unit_size: encoding.unit_size(),
        multibyte: encoding.is_multibyte(),
        bom: encoding.bom().map(|bom| format!("{:02X?}", bom)),
    }
}

#[cfg(feature = "cli")]
fn list_command(cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let encodings: Vec<_> = Encoding::SUPPORTED.into_iter().map(encoding_info).collect();
            println!("{}", serde_json::to_string_pretty(&encodings)?);
        }
        OutputFormat::Text => {
            println!("Supported Encodings ({} total):", Encoding::SUPPORTED.len());
            println!();
            for encoding in Encoding::SUPPORTED {
                println!(
                    "{:10} {:4} {}",
                    encoding.name(),
                    format!("[{}]", encoding.id()),
                    get_encoding_description(encoding)
                );
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn info_command(args: &InfoArgs, cli: &Cli) -> Result<()> {
    let encoding = args.encoding.concrete()?;
    let info = encoding_info(encoding);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => {
            println!("Encoding Information: {}", info.name);
            println!("Description: {}", get_encoding_description(encoding));
            println!("Id: {}", info.id);
            if let Some(unit_size) = info.unit_size {
                println!("Code unit: {} byte(s)", unit_size);
            }
            println!(
                "Multibyte: {}",
                if info.multibyte { "Yes" } else { "No" }
            );
            println!("BOM: {}", info.bom.as_deref().unwrap_or("None"));
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn get_encoding_description(encoding: Encoding) -> &'static str {
    match encoding {
        Encoding::ASCII => "American Standard Code for Information Interchange (7-bit)",
        Encoding::UTF8 => "Unicode Transformation Format 8-bit, variable-length encoding",
        Encoding::UTF16BE => "Unicode Transformation Format 16-bit, big-endian",
        Encoding::UTF16LE => "Unicode Transformation Format 16-bit, little-endian",
        Encoding::UTF32BE => "Unicode Transformation Format 32-bit, big-endian",
        Encoding::UTF32LE => "Unicode Transformation Format 32-bit, little-endian",
        Encoding::UNKNOWN => "Unrecognised encoding",
    }
}

#[cfg(feature = "cli")]
fn classify(code_point: u32) -> Result<CodePointReport> {
    let alphabetic = fast_utf::is_alpha(code_point)?;
    let letter = UnicodeTable.lookup(code_point);
    Ok(CodePointReport {
        code_point: format_code_point(code_point),
        alphabetic,
        case: letter.map(|letter| letter.case),
        numeric: fast_utf::is_numeric(code_point)?,
        whitespace: fast_utf::is_whitespace(code_point)?,
        newline: fast_utf::is_newline(code_point)?,
        upper: format_code_point(fast_utf::to_upper(code_point)?),
        lower: format_code_point(fast_utf::to_lower(code_point)?),
        title: format_code_point(fast_utf::to_title(code_point)?),
    })
}

#[cfg(feature = "cli")]
fn classify_command(args: &ClassifyArgs, cli: &Cli) -> Result<()> {
    let reports = args
        .code_points
        .iter()
        .map(|&CodePointArg(code_point)| classify(code_point))
        .collect::<Result<Vec<_>>>()?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            for report in reports {
                let case = report
                    .case
                    .map_or_else(|| "-".to_string(), |case| format!("{:?}", case));
                println!(
                    "{}  alpha={} case={} numeric={} whitespace={} newline={}  upper={} lower={} title={}",
                    report.code_point,
                    report.alphabetic,
                    case,
                    report.numeric,
                    report.whitespace,
                    report.newline,
                    report.upper,
                    report.lower,
                    report.title
                );
            }
        }
    }

    Ok(())
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn code_point(arg: &str) -> u32 {
        arg.parse::<CodePointArg>().unwrap().0
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_code_point_forms() {
        assert_eq!(code_point("U+00E9"), 0xE9);
        assert_eq!(code_point("u+1f600"), 0x1F600);
        assert_eq!(code_point("0xE9"), 0xE9);
        assert_eq!(code_point("233"), 233);
        assert_eq!(code_point("é"), 0xE9);
        assert!("".parse::<CodePointArg>().is_err());
        assert!("ab".parse::<CodePointArg>().is_err());
        assert!("U+XYZ".parse::<CodePointArg>().is_err());
    }

    #[test]
    fn test_single_digit_is_a_character() {
        assert_eq!(code_point("7"), '7' as u32);
        assert_eq!(code_point("0x7"), 0x07);
        assert_eq!(code_point("10"), 10);
    }

    #[test]
    fn test_in_place_requires_input() {
        let missing_input =
            Cli::try_parse_from(["fast-utf", "convert", "-f", "utf8", "-t", "utf16le", "--in-place"]);
        let err = missing_input.err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let with_input = Cli::try_parse_from([
            "fast-utf",
            "convert",
            "-f",
            "utf8",
            "-t",
            "utf16le",
            "-i",
            "notes.txt",
            "--in-place",
        ]);
        assert!(with_input.is_ok());
    }

    #[test]
    fn test_in_place_conflicts_with_output() {
        let result = Cli::try_parse_from([
            "fast-utf",
            "convert",
            "-f",
            "utf8",
            "-t",
            "ascii",
            "-i",
            "in.txt",
            "-o",
            "out.txt",
            "--in-place",
        ]);
        let err = result.err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
