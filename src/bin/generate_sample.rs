use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use co2_explorer::data::model::Column;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (make, models)
const MAKES: [(&str, [&str; 3]); 6] = [
    ("ACURA", ["ILX", "MDX 4WD", "TLX"]),
    ("BMW", ["320i", "X5 xDRIVE35i", "M4"]),
    ("CHEVROLET", ["SPARK", "SILVERADO 4WD", "EQUINOX AWD"]),
    ("FORD", ["FOCUS FFV", "F-150 FFV", "ESCAPE 4WD"]),
    ("TOYOTA", ["COROLLA", "RAV4 AWD", "TACOMA 4WD"]),
    ("VOLKSWAGEN", ["GOLF", "JETTA TDI", "TOUAREG"]),
];

/// (class, typical engine size in litres)
const CLASSES: [(&str, f64); 6] = [
    ("COMPACT", 1.8),
    ("MID-SIZE", 2.5),
    ("SUV - SMALL", 2.4),
    ("SUV - STANDARD", 3.6),
    ("PICKUP TRUCK - STANDARD", 5.0),
    ("TWO-SEATER", 3.0),
];

const TRANSMISSIONS: [&str; 6] = ["A6", "AS8", "M6", "AV", "AM7", "AS10"];

/// (fuel type, relative share, g CO2 per litre)
const FUELS: [(&str, u32, f64); 4] = [("X", 50, 23.2), ("Z", 40, 23.2), ("D", 5, 26.7), ("E", 5, 16.5)];

fn pick_fuel(rng: &mut SimpleRng) -> (&'static str, f64) {
    let total: u32 = FUELS.iter().map(|f| f.1).sum();
    let mut roll = (rng.next_u64() % u64::from(total)) as u32;
    for (fuel, share, factor) in FUELS {
        if roll < share {
            return (fuel, factor);
        }
        roll -= share;
    }
    ("X", 23.2)
}

/// Write a synthetic vehicle CO2 emissions CSV with the source headers.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version, about)]
struct GenerateArgs {
    /// Destination CSV file
    #[arg(short, long, value_name = "PATH", default_value = "CO2 Emissions_Canada.csv")]
    output: PathBuf,

    /// Number of vehicles to write
    #[arg(long, default_value_t = 1000)]
    rows: usize,

    /// PRNG seed; the same seed always writes the same file
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = GenerateArgs::parse();
    env_logger::init();
    let GenerateArgs {
        output: output_path,
        rows,
        seed,
    } = args;

    let mut rng = SimpleRng::new(seed);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record(Column::ALL.iter().map(|c| c.source_name()))?;

    for _ in 0..rows {
        let (make, models) = rng.pick(&MAKES);
        let model = rng.pick(models);
        let &(class, base_engine) = rng.pick(&CLASSES);
        let transmission = rng.pick(&TRANSMISSIONS);
        let (fuel, co2_per_litre) = pick_fuel(&mut rng);

        let engine = (rng.gauss(base_engine, 0.4).clamp(1.0, 6.8) * 10.0).round() / 10.0;
        let cylinders = match engine {
            e if e < 2.6 => 4,
            e if e < 4.0 => 6,
            _ => 8,
        };
        let combined = (4.0 + 2.2 * engine + rng.gauss(0.0, 0.6)).max(4.0);
        let city = combined * 1.15;
        let highway = combined * 0.82;
        let mpg = (235.21 / combined).round();
        let co2 = (combined * co2_per_litre).round();

        writer.write_record([
            make.to_string(),
            model.to_string(),
            class.to_string(),
            format!("{engine:.1}"),
            cylinders.to_string(),
            transmission.to_string(),
            fuel.to_string(),
            format!("{city:.1}"),
            format!("{highway:.1}"),
            format!("{combined:.1}"),
            format!("{mpg:.0}"),
            format!("{co2:.0}"),
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!("Wrote {rows} vehicles to {}", output_path.display());
    println!("Wrote {rows} vehicles to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn output_defaults_to_the_dataset_file_name() {
        GenerateArgs::command().debug_assert();
        let args = GenerateArgs::try_parse_from(["generate_sample"]).expect("parse");
        assert_eq!(args.output, PathBuf::from("CO2 Emissions_Canada.csv"));
        assert_eq!(args.rows, 1000);
    }

    #[test]
    fn output_is_a_flag_not_a_positional() {
        let args = GenerateArgs::try_parse_from(["generate_sample", "--output", "out.csv", "--rows", "5"])
            .expect("parse");
        assert_eq!(args.output, PathBuf::from("out.csv"));
        assert_eq!(args.rows, 5);
        assert!(GenerateArgs::try_parse_from(["generate_sample", "out.csv"]).is_err());
    }
}
