//! Hide a message in an image and read it back.
//!
//! Usage:
//! ```sh
//! cargo run --example hide_message -- input.png output.png "secret text"
//! ```

use std::env;
use std::process;

use lsb_stego::{ProcessOptions, SecurityLevel, StegoEngine};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <output> <message>", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let message = &args[3];

    let engine = StegoEngine::new();
    let opts = ProcessOptions {
        security_level: SecurityLevel::CoverNoise,
        ..ProcessOptions::default()
    };
    let result = engine.encode_file(input.as_ref(), output.as_ref(), message, &opts);
    if !result.success {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
    println!("Done: {} ({} of {} bits)", result.message, result.bits_used, result.capacity);

    match engine.decode_file(output.as_ref()) {
        Ok(decoded) => println!("Read back: {}", decoded.text),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
