use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        let i = (self.next_f64() * options.len() as f64) as usize;
        options[i.min(options.len() - 1)]
    }
}

/// Column-major synthetic stroke table.
#[derive(Default)]
struct Columns {
    id: Vec<i64>,
    gender: Vec<&'static str>,
    age: Vec<f64>,
    hypertension: Vec<i64>,
    heart_disease: Vec<i64>,
    ever_married: Vec<&'static str>,
    work_type: Vec<&'static str>,
    residence_type: Vec<&'static str>,
    avg_glucose_level: Vec<f64>,
    bmi: Vec<Option<f64>>,
    smoking_status: Vec<&'static str>,
    stroke: Vec<i64>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Columns {
    let mut c = Columns::default();

    for i in 0..rows {
        let age = round2(rng.gauss(43.0, 22.0).clamp(0.08, 82.0));
        let adult = age >= 18.0;
        let hypertension = rng.chance(if age > 50.0 { 0.2 } else { 0.04 });
        let heart_disease = rng.chance(if age > 60.0 { 0.12 } else { 0.02 });
        let glucose = round2(rng.gauss(106.0, 45.0).clamp(55.12, 271.74));
        // roughly 4% of BMI measurements are missing in the source data
        let bmi = (!rng.chance(0.04)).then(|| round2(rng.gauss(28.9, 7.8).clamp(10.3, 97.6)));

        let risk = 0.002
            + 0.0009 * age
            + if hypertension { 0.03 } else { 0.0 }
            + if heart_disease { 0.04 } else { 0.0 }
            + if glucose > 180.0 { 0.02 } else { 0.0 };

        c.id.push(i as i64 + 1);
        c.gender.push(rng.pick(&["Male", "Female", "Female"]));
        c.age.push(age);
        c.hypertension.push(i64::from(hypertension));
        c.heart_disease.push(i64::from(heart_disease));
        c.ever_married.push(if adult && rng.chance(0.8) { "Yes" } else { "No" });
        c.work_type.push(if adult {
            rng.pick(&["Private", "Private", "Self-employed", "Govt_job", "Never_worked"])
        } else {
            "children"
        });
        c.residence_type.push(rng.pick(&["Urban", "Rural"]));
        c.avg_glucose_level.push(glucose);
        c.bmi.push(bmi);
        c.smoking_status.push(rng.pick(&["never smoked", "Unknown", "formerly smoked", "smokes"]));
        c.stroke.push(i64::from(rng.chance(risk)));
    }

    c
}

fn write_csv(path: &Path, c: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    writer.write_record([
        "id",
        "gender",
        "age",
        "hypertension",
        "heart_disease",
        "ever_married",
        "work_type",
        "Residence_type",
        "avg_glucose_level",
        "bmi",
        "smoking_status",
        "stroke",
    ])?;
    for i in 0..c.id.len() {
        writer.write_record([
            c.id[i].to_string(),
            c.gender[i].to_string(),
            c.age[i].to_string(),
            c.hypertension[i].to_string(),
            c.heart_disease[i].to_string(),
            c.ever_married[i].to_string(),
            c.work_type[i].to_string(),
            c.residence_type[i].to_string(),
            c.avg_glucose_level[i].to_string(),
            c.bmi[i].map_or_else(|| "N/A".to_string(), |v| v.to_string()),
            c.smoking_status[i].to_string(),
            c.stroke[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(path: &Path, c: &Columns) -> Result<()> {
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        text("gender"),
        Field::new("age", DataType::Float64, false),
        Field::new("hypertension", DataType::Int64, false),
        Field::new("heart_disease", DataType::Int64, false),
        text("ever_married"),
        text("work_type"),
        text("Residence_type"),
        Field::new("avg_glucose_level", DataType::Float64, false),
        Field::new("bmi", DataType::Float64, true),
        text("smoking_status"),
        Field::new("stroke", DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(c.id.clone())),
        Arc::new(StringArray::from(c.gender.clone())),
        Arc::new(Float64Array::from(c.age.clone())),
        Arc::new(Int64Array::from(c.hypertension.clone())),
        Arc::new(Int64Array::from(c.heart_disease.clone())),
        Arc::new(StringArray::from(c.ever_married.clone())),
        Arc::new(StringArray::from(c.work_type.clone())),
        Arc::new(StringArray::from(c.residence_type.clone())),
        Arc::new(Float64Array::from(c.avg_glucose_level.clone())),
        Arc::new(Float64Array::from(c.bmi.clone())),
        Arc::new(StringArray::from(c.smoking_status.clone())),
        Arc::new(Int64Array::from(c.stroke.clone())),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let rows: usize = match std::env::args().nth(1) {
        Some(n) => n.parse().context("row count must be a positive integer")?,
        None => 5110,
    };

    let mut rng = SimpleRng::new(42);
    let columns = generate(rows, &mut rng);

    let csv_path = Path::new("sample_stroke_data.csv");
    let parquet_path = Path::new("sample_stroke_data.parquet");
    write_csv(csv_path, &columns)?;
    write_parquet(parquet_path, &columns)?;

    let strokes = columns.stroke.iter().filter(|&&s| s == 1).count();
    let null_bmi = columns.bmi.iter().filter(|b| b.is_none()).count();
    println!(
        "Wrote {rows} records ({strokes} strokes, {null_bmi} null bmi) to {} and {}",
        csv_path.display(),
        parquet_path.display()
    );

    Ok(())
}
