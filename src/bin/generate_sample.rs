use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Normal sample via the Box-Muller transform.
fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Per equipment type: (name, count, flowrate μ/σ, pressure μ/σ, temperature μ/σ).
const PROFILES: [(&str, usize, (f64, f64), (f64, f64), (f64, f64)); 6] = [
    ("Pump", 12, (120.0, 12.0), (5.5, 0.6), (110.0, 6.0)),
    ("Compressor", 6, (95.0, 8.0), (8.2, 0.9), (96.0, 5.0)),
    ("Valve", 10, (62.0, 9.0), (4.2, 0.4), (104.0, 4.0)),
    ("HeatExchanger", 5, (150.0, 15.0), (6.1, 0.5), (128.0, 8.0)),
    ("Reactor", 4, (140.0, 10.0), (7.4, 0.7), (135.0, 9.0)),
    ("Condenser", 3, (180.0, 14.0), (6.6, 0.4), (118.0, 5.0)),
];

fn main() -> Result<()> {
    // Fixed seed so the sample file is reproducible.
    let mut rng = SmallRng::seed_from_u64(42);
    let output_path = "sample_equipment.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"])?;

    let mut rows = 0usize;
    for (kind, count, flow_p, pressure_p, temp_p) in PROFILES {
        for i in 1..=count {
            let name = format!("{kind}-{i}");
            let flowrate = format!("{:.1}", gauss(&mut rng, flow_p.0, flow_p.1).max(0.0));
            let pressure = format!("{:.1}", gauss(&mut rng, pressure_p.0, pressure_p.1).max(0.0));
            // Every 15th reading is missing to exercise the degraded paths.
            let temperature = if rows % 15 == 14 {
                String::new()
            } else {
                format!("{:.1}", gauss(&mut rng, temp_p.0, temp_p.1))
            };
            writer.write_record([
                name.as_str(),
                kind,
                flowrate.as_str(),
                pressure.as_str(),
                temperature.as_str(),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} equipment rows to {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_readings() {
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        let xs: Vec<f64> = (0..5).map(|_| gauss(&mut a, 100.0, 10.0)).collect();
        let ys: Vec<f64> = (0..5).map(|_| gauss(&mut b, 100.0, 10.0)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn samples_centre_on_the_mean() {
        let mut rng = SmallRng::seed_from_u64(7);
        let n = 4000;
        let mean = (0..n).map(|_| gauss(&mut rng, 50.0, 5.0)).sum::<f64>() / n as f64;
        assert!((mean - 50.0).abs() < 0.5, "mean {mean}");
    }
}
