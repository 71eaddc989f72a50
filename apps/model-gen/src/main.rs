use clap::Parser;
use pricecast_ml::dataset::{self, GeneratedModels};
use pricecast_ml::{ModelKind, PersistedModel};
use pricecast_types::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Fits the demo car, house and laptop models and writes them to a model directory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the model and column files are written to
    #[arg(short, long, default_value = "models")]
    out: PathBuf,

    /// Seed for the synthetic training data
    #[arg(long, env = "MODEL_GEN_SEED", default_value_t = 42)]
    seed: u64,
}

fn write_models(out: &Path, models: GeneratedModels) -> Result<()> {
    std::fs::create_dir_all(out)?;

    let files = [
        (ModelKind::Car, models.car),
        (ModelKind::House, models.house),
        (ModelKind::Laptop, models.laptop),
    ];
    for (kind, model) in files {
        let path = out.join(kind.model_file());
        std::fs::write(&path, PersistedModel::linear(model, "price").to_json_vec()?)?;
        tracing::info!(model = %kind, path = %path.display(), "wrote model");
    }

    let columns = [
        (ModelKind::House, &models.house_columns),
        (ModelKind::Laptop, &models.laptop_columns),
    ];
    for (kind, schema) in columns {
        let Some(file) = kind.columns_file() else {
            continue;
        };
        let path = out.join(file);
        std::fs::write(&path, serde_json::to_vec_pretty(schema)?)?;
        tracing::info!(model = %kind, columns = schema.len(), path = %path.display(), "wrote column schema");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    tracing::info!(seed = args.seed, out = %args.out.display(), "generating models");

    let models = dataset::generate(args.seed)?;
    write_models(&args.out, models)?;

    tracing::info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_ml::ModelRegistry;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("pricecast-model-gen").chain(list.iter().copied()))
    }

    #[test]
    fn out_defaults_to_models() {
        assert_eq!(args(&[]).unwrap().out, PathBuf::from("models"));
    }

    #[test]
    fn out_accepts_long_short_and_inline_forms() {
        assert_eq!(args(&["--out", "a"]).unwrap().out, PathBuf::from("a"));
        assert_eq!(args(&["-o", "b"]).unwrap().out, PathBuf::from("b"));
        assert_eq!(args(&["--out=c"]).unwrap().out, PathBuf::from("c"));
        assert!(args(&["--out"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn seed_flag_is_parsed() {
        assert_eq!(args(&["--seed", "7"]).unwrap().seed, 7);
        assert!(args(&["--seed", "-1"]).is_err());
        assert!(args(&["--seed", "many"]).is_err());
    }

    #[test]
    fn written_directory_loads_every_model() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        write_models(&out, dataset::generate(11).unwrap()).unwrap();

        let registry = ModelRegistry::load_dir(&out).unwrap();
        assert_eq!(registry.loaded(), ModelKind::ALL.to_vec());
    }
}
