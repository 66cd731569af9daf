use clap::{Parser, ValueEnum};
use miller::{encode_bits, parse_bits, PlotConfig, Waveform};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about = "Encode a bit string into Miller line code", long_about = None)]
struct Cli {
    /// Bits to encode, read from the first stdin line when omitted
    bits: Option<String>,
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Write a PNG step plot of the message and its encoding
    #[arg(short, long)]
    plot: Option<PathBuf>,
    /// Horizontal pixels per half-bit sample in the plot
    #[arg(long, default_value_t = PlotConfig::default().sample_width,
          value_parser = clap::value_parser!(u32).range(1..=256))]
    sample_width: u32,
    /// Leave the 0/1 labels out of the plot
    #[arg(long)]
    no_labels: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// symbols separated by spaces
    Text,
    /// levels packed MSB first, as hex
    Hex,
    /// one level per half-bit
    Levels,
}

fn run(cli: Cli) -> miller::Result<()> {
    let input = match cli.bits {
        Some(bits) => bits,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim().to_string()
        }
    };

    let bits = parse_bits(&input)?;
    let encoded = encode_bits(&bits);
    match cli.format {
        Format::Text => println!("{encoded}"),
        Format::Hex => println!("{}", encoded.to_hex()),
        Format::Levels => {
            let levels: String = encoded.levels().map(|l| char::from(b'0' + l)).collect();
            println!("{levels}");
        }
    }

    if let Some(path) = cli.plot {
        let config = PlotConfig {
            sample_width: cli.sample_width,
            labels: !cli.no_labels,
            ..PlotConfig::default()
        };
        Waveform::new(&bits).save(path, &config)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
