//! Sample Invoice Generator
//!
//! Writes a synthetic invoice CSV for exercising the /fraudulent upload page.
//!
//! Usage: sample_invoices [count] [fraud_rate] [output.csv]

use rand::Rng;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Row layout expected by the fraud filter
#[derive(Debug, Clone, Serialize)]
struct InvoiceRow {
    #[serde(rename = "InvoiceID")]
    invoice_id: u64,
    #[serde(rename = "InvoiceAmount")]
    invoice_amount: f64,
    #[serde(rename = "InvoiceText")]
    invoice_text: String,
    #[serde(rename = "Fraudulent")]
    fraudulent: u8,
}

/// Invoice generator for testing
struct InvoiceGenerator {
    rng: rand::rngs::ThreadRng,
    invoice_counter: u64,
}

impl InvoiceGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            invoice_counter: 0,
        }
    }

    /// Generate an ordinary supplier invoice
    fn generate_legitimate(&mut self) -> InvoiceRow {
        self.invoice_counter += 1;
        let item = self.random_choice(&[
            "Office supplies",
            "Raw materials",
            "Software subscription",
            "Freight charges",
            "Maintenance contract",
        ]);

        InvoiceRow {
            invoice_id: 10_000 + self.invoice_counter,
            invoice_amount: round_cents(self.rng.gen_range(500.0..50_000.0)),
            invoice_text: item.to_string(),
            fraudulent: 0,
        }
    }

    /// Generate an invoice with the usual red flags
    fn generate_suspicious(&mut self) -> InvoiceRow {
        self.invoice_counter += 1;
        let item = self.random_choice(&[
            "Consulting services",
            "Miscellaneous charges",
            "Advance payment",
            "Duplicate billing adjustment",
        ]);

        InvoiceRow {
            invoice_id: 10_000 + self.invoice_counter,
            // Large round amounts
            invoice_amount: (self.rng.gen_range(10..200) * 5_000) as f64,
            invoice_text: item.to_string(),
            fraudulent: 1,
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_invoices=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.1_f64)
        .clamp(0.0, 1.0);
    let output = args.get(3);

    info!(count = count, fraud_rate = fraud_rate, output = ?output, "Generating invoices");

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    let mut generator = InvoiceGenerator::new();
    let mut rng = rand::thread_rng();
    let mut suspicious_count = 0;

    for _ in 0..count {
        let row = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };
        writer.serialize(&row)?;
    }
    writer.flush()?;

    info!(
        "Completed! Wrote {} invoices ({} legitimate, {} suspicious)",
        count,
        count - suspicious_count,
        suspicious_count
    );

    Ok(())
}
