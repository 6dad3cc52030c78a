use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use lsb_stego::noise::{NoiseOptions, DEFAULT_AMPLITUDE, DEFAULT_PROBABILITY};
use lsb_stego::{default_output_path, ProcessOptions, ProcessResult, SecurityLevel, StegoEngine};

#[derive(Parser)]
#[command(
    name = "lsb-stego",
    about = "Hide text in the least-significant bits of raster images",
    version,
    after_help = "Simple usage: lsb-stego encode photo.png -m <message>  (writes photo_encoded.png)\n\
                  Recover it with: lsb-stego decode photo_encoded.png\n\n\
                  NOTE: The message is not encrypted, and it does not survive JPEG\n\
                  re-compression or resizing. Encoded images are always written losslessly."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Hide a message in an image file or every image in a directory
    Encode(EncodeArgs),
    /// Print the message hidden in an image
    Decode(DecodeArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Cover image file or directory
    input: String,

    /// Message to hide (characters up to U+00FF)
    #[arg(short, long)]
    message: String,

    /// Output file or directory (default: {name}_encoded.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Security level: 1 = plain LSB, 2+ = add parity-preserving cover noise
    #[arg(short, long, default_value_t = 1)]
    security_level: u8,

    /// Probability that a sample is jittered by the cover noise pass (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_PROBABILITY)]
    noise_probability: f64,

    /// Jitter magnitude used by the cover noise pass (even, non-zero)
    #[arg(long, default_value_t = DEFAULT_AMPLITUDE)]
    noise_amplitude: u8,
}

#[derive(Args)]
struct DecodeArgs {
    /// Image with a hidden message
    input: String,

    /// Exit with status 2 if the recovered text does not look like a message
    #[arg(long)]
    require_printable: bool,
}

fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match cli.command {
        Command::Encode(args) => encode(&args, cli.verbose, cli.quiet),
        Command::Decode(args) => decode(&args, cli.quiet),
    }
}

fn encode(args: &EncodeArgs, verbose: bool, quiet: bool) {
    let noise = NoiseOptions {
        probability: args.noise_probability,
        amplitude: args.noise_amplitude,
    };
    if let Err(e) = noise.validate() {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let opts = ProcessOptions {
        security_level: SecurityLevel::from_level(args.security_level),
        noise,
        verbose,
        quiet,
    };

    let engine = StegoEngine::new();

    let input_path = Path::new(&args.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input);
        process::exit(1);
    }

    if !opts.quiet && opts.security_level == SecurityLevel::CoverNoise {
        eprintln!(
            "Cover noise enabled ({:.0}% of samples, ±{})",
            opts.noise.probability * 100.0,
            opts.noise.amplitude
        );
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &args.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: lsb-stego encode <input_dir> -m <message> -o <output_dir>");
            process::exit(1);
        };
        engine.encode_directory(input_path, &output_dir, &args.message, &opts)
    } else {
        let output_path = match &args.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine.encode_file(input_path, &output_path, &args.message, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Encoded: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn decode(args: &DecodeArgs, quiet: bool) {
    let engine = StegoEngine::new();

    let decoded = match engine.decode_file(Path::new(&args.input)) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", args.input);
            process::exit(1);
        }
    };

    println!("{}", decoded.text);

    if !decoded.printable {
        if !quiet {
            eprintln!("WARNING: recovered text does not look like a hidden message");
        }
        if args.require_printable {
            process::exit(2);
        }
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        if !opts.quiet {
            match &result.output {
                Some(out) => eprintln!("[OK] {filename} -> {}", out.display()),
                None => eprintln!("[OK] {filename}"),
            }
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose {
        if result.capacity > 0 {
            eprintln!(
                "  -> {} of {} bits used",
                result.bits_used, result.capacity
            );
        }
        if !result.message.is_empty() {
            eprintln!("  -> {}", result.message);
        }
    }
}
