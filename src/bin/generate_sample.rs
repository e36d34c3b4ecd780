use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 12] = [
    "Rank",
    "Name",
    "Year",
    "Brand",
    "Model",
    "ChassisCode",
    "EngineL",
    "EngineType",
    "Drivetrain",
    "RaceEvent",
    "Date",
    "Time",
];

/// (brand, model, chassis, engine litres, engine type, drivetrain, base lap seconds)
const VEHICLES: [(&str, &str, &str, f64, &str, &str, f64); 14] = [
    ("Porsche", "911 GT3 RS", "992.1", 4.0, "NA", "RWD", 96.5),
    ("Porsche", "911 Turbo S", "992.1", 3.7, "FI", "AWD", 97.8),
    ("Porsche", "Cayman GT4", "718", 4.0, "NA", "RWD", 100.2),
    ("Honda", "Civic Type R", "FL5", 2.0, "FI", "FWD", 104.1),
    ("Honda", "S2000", "AP2", 2.2, "NA", "RWD", 106.3),
    ("Nissan", "GT-R Nismo", "R35", 3.8, "FI", "AWD", 97.1),
    ("BMW", "M2", "G87", 3.0, "FI", "RWD", 101.4),
    ("BMW", "M4 CSL", "G82", 3.0, "FI", "RWD", 99.0),
    ("Toyota", "GR Yaris", "GXPA16", 1.6, "FI", "AWD", 105.2),
    ("Toyota", "GR86", "ZN8", 2.4, "NA", "RWD", 106.9),
    ("Mazda", "MX-5", "ND", 2.0, "NA", "RWD", 109.5),
    ("Chevrolet", "Corvette Z06", "C8", 5.5, "NA", "RWD", 96.0),
    ("Audi", "RS3", "8Y", 2.5, "FI", "AWD", 103.0),
    ("Hyundai", "i30 N", "PDe", 2.0, "FI", "FWD", 106.0),
];

const EVENTS: [&str; 4] = [
    "Spring Time Attack",
    "Summer Sprint",
    "Club Challenge",
    "Autumn Finale",
];
const DRIVERS: [&str; 8] = ["Alex", "Sam", "Jordan", "Taylor", "Robin", "Casey", "Morgan", "Jamie"];

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Render a lap time the way hand-entered source data tends to look:
/// mostly `MM:SS.SSS`, some bare seconds, a few padded or unusable entries.
fn messy_time(seconds: f64, rng: &mut SimpleRng) -> String {
    let minutes = (seconds / 60.0).floor() as u32;
    let rem = seconds - f64::from(minutes) * 60.0;
    match rng.next_u64() % 20 {
        0 => "DNF".to_string(),
        1 => String::new(),
        2 | 3 => format!("{seconds:.3}"),
        4 => format!("  {minutes:02}:{rem:06.3} "),
        _ => format!("{minutes:02}:{rem:06.3}"),
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut rows: Vec<(f64, [String; 12])> = Vec::with_capacity(100);
    for i in 0..100 {
        let &(brand, model, chassis, litres, engine_type, drivetrain, base) =
            &VEHICLES[i % VEHICLES.len()];
        let seconds = base + rng.next_f64() * 6.0;
        let year = 2015 + (rng.next_u64() % 10);
        let month = 1 + rng.next_u64() % 12;
        let day = 1 + rng.next_u64() % 28;
        let driver = rng.pick(&DRIVERS);
        let event = rng.pick(&EVENTS);

        rows.push((
            seconds,
            [
                String::new(),
                format!("{driver} #{i}"),
                year.to_string(),
                // Trailing space on some brands, cleaned up on load.
                if i % 7 == 0 { format!("{brand} ") } else { brand.to_string() },
                model.to_string(),
                chassis.to_string(),
                format!("{litres:.1}"),
                engine_type.to_string(),
                drivetrain.to_string(),
                event.to_string(),
                format!("{year}-{month:02}-{day:02}"),
                messy_time(seconds, &mut rng),
            ],
        ));
    }

    // Rank by underlying lap time.
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (rank, (_, row)) in rows.iter_mut().enumerate() {
        row[0] = (rank + 1).to_string();
    }

    // ---- CSV ----
    let csv_path = "elite100.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    writer.write_record(COLUMNS).context("writing CSV header")?;
    for (_, row) in &rows {
        writer.write_record(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let arrays = (0..COLUMNS.len())
        .map(|col| {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|(_, row)| Some(row[col].as_str()).filter(|s| !s.is_empty()))
                .collect();
            Arc::new(StringArray::from(values)) as arrow::array::ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let parquet_path = "elite100.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {} vehicles to {csv_path} and {parquet_path}", rows.len());
    Ok(())
}
