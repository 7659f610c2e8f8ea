//! Play-tennis weather demo.
//!
//! Trains one model on purely categorical observations and one on mixed
//! categorical and numeric observations, then predicts a new day with each.
//!
//! ```bash
//! RUST_LOG=bayes_table=debug cargo run -p bayes-table --example weather
//! ```

use bayes_table::{row, NaiveBayes, NaiveBayesConfig, Prediction, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bayes_table=info")),
        )
        .init();

    categorical()?;
    println!();
    numeric()?;
    Ok(())
}

fn categorical() -> Result<()> {
    let config = NaiveBayesConfig::new(["weather", "temperature", "humidity", "wind", "play?"])
        .with_verbose(true)
        .with_data(vec![
            row!["Sunny", "Hot", "High", "Weak", "No"],
            row!["Sunny", "Hot", "High", "Strong", "No"],
            row!["Overcast", "Hot", "High", "Weak", "Yes"],
            row!["Rain", "Mild", "High", "Weak", "Yes"],
            row!["Rain", "Cool", "Normal", "Weak", "Yes"],
            row!["Rain", "Cool", "Normal", "Strong", "No"],
            row!["Overcast", "Cool", "Normal", "Strong", "Yes"],
            row!["Sunny", "Mild", "High", "Weak", "No"],
            row!["Sunny", "Cool", "Normal", "Weak", "Yes"],
            row!["Rain", "Mild", "Normal", "Weak", "Yes"],
            row!["Sunny", "Mild", "Normal", "Strong", "Yes"],
            row!["Overcast", "Mild", "High", "Strong", "Yes"],
            row!["Overcast", "Hot", "Normal", "Weak", "Yes"],
            row!["Rain", "Mild", "High", "Strong", "No"],
        ]);

    let mut model = NaiveBayes::new(config)?;
    model.train()?;

    if let Some(frequencies) = model.frequencies() {
        println!("Frequencies:");
        println!("{}", serde_json::to_string_pretty(frequencies)?);
    }

    let prediction = model.predict(&row!["Sunny", "Cool", "High", "Strong"])?;
    report("Categorical", &prediction);
    Ok(())
}

fn numeric() -> Result<()> {
    let config = NaiveBayesConfig::new(["weather", "temperature", "humidity", "wind", "play?"])
        .with_verbose(true)
        .with_data(vec![
            row!["Sunny", 85, 85, "Weak", "No"],
            row!["Sunny", 80, 90, "Strong", "No"],
            row!["Overcast", 83, 86, "Weak", "Yes"],
            row!["Rain", 70, 96, "Weak", "Yes"],
            row!["Rain", 68, 80, "Weak", "Yes"],
            row!["Rain", 65, 70, "Strong", "No"],
            row!["Overcast", 64, 65, "Strong", "Yes"],
            row!["Sunny", 72, 95, "Weak", "No"],
            row!["Sunny", 69, 70, "Weak", "Yes"],
            row!["Rain", 75, 80, "Weak", "Yes"],
            row!["Sunny", 75, 70, "Strong", "Yes"],
            row!["Overcast", 72, 90, "Strong", "Yes"],
            row!["Overcast", 81, 75, "Weak", "Yes"],
            row!["Rain", 71, 91, "Strong", "No"],
        ]);

    let mut model = NaiveBayes::new(config)?;

    // Eager training builds the tables on first use.
    let prediction = model.predict(&row!["Sunny", 66, 90, "Strong"])?;
    report("Numeric", &prediction);

    if let Some(frequencies) = model.frequencies() {
        println!("Frequencies:");
        println!("{}", serde_json::to_string_pretty(frequencies)?);
    }
    Ok(())
}

fn report(title: &str, prediction: &Prediction) {
    println!("{title} prediction: {}", prediction.label());
    if let Some(scores) = prediction.scores() {
        for (label, score) in scores {
            println!("  {label}: {score:.6e}");
        }
    }
}
