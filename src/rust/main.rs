use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use docsort::{Classifier, ClassifierBuilder, ClassifierConfig, KeywordClassifier};
#[cfg(feature = "onnx")]
use docsort::{BuiltinModel, ModelManager};

/// Sort documents into Resume, Report, Legal Document or Other.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to classify; reads standard input when none are given
    files: Vec<PathBuf>,

    /// Maximum number of normalized characters considered per document
    #[arg(long)]
    max_length: Option<usize>,

    /// Skip embeddings and classify by keyword counts only
    #[arg(long, conflicts_with = "hashing")]
    keywords_only: bool,

    /// Use the model-free hashing embedder instead of the built-in model
    #[arg(long)]
    hashing: bool,

    /// Force a fresh download of the model files
    #[arg(short, long)]
    fresh: bool,

    /// Print the decision trace for every document
    #[arg(long)]
    explain: bool,
}

enum Backend {
    Hybrid(Classifier),
    Keywords(KeywordClassifier),
}

impl Backend {
    fn report(&self, name: &str, text: &str, explain: bool) {
        let classification = match self {
            Backend::Hybrid(classifier) => {
                let decision = classifier.explain(text);
                if explain {
                    println!("{}: {:?}", name, decision);
                }
                docsort::Classification::from(&decision)
            }
            Backend::Keywords(classifier) => classifier.classify(text),
        };
        println!("{}\t{}\t{:.3}", name, classification.label(), classification.confidence);
    }
}

#[cfg(feature = "onnx")]
async fn ensure_model_downloaded(fresh: bool) -> Result<()> {
    let manager = ModelManager::new_default().context("Failed to open model cache")?;
    let model = BuiltinModel::MiniLM;

    if fresh {
        info!("Fresh download requested - removing any existing model files...");
        manager.remove_download(model)?;
    }

    manager.ensure_model_downloaded(model).await?;
    Ok(())
}

#[cfg(feature = "onnx")]
async fn model_builder(builder: ClassifierBuilder, fresh: bool) -> Result<ClassifierBuilder> {
    ensure_model_downloaded(fresh).await?;
    Ok(builder.with_model(BuiltinModel::MiniLM)?)
}

#[cfg(not(feature = "onnx"))]
async fn model_builder(builder: ClassifierBuilder, _fresh: bool) -> Result<ClassifierBuilder> {
    warn!("Built without the onnx feature, using the hashing embedder");
    Ok(builder.with_hashing_embedder())
}

async fn build_backend(args: &Args, config: ClassifierConfig) -> Result<Backend> {
    if args.keywords_only {
        return Ok(Backend::Keywords(KeywordClassifier::new(config)));
    }

    let builder = ClassifierBuilder::new().with_config(config);
    let builder = if args.hashing {
        builder.with_hashing_embedder()
    } else {
        model_builder(builder, args.fresh).await?
    };
    Ok(Backend::Hybrid(builder.build()?))
}

fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>> {
    if files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return Ok(vec![("-".to_string(), text)]);
    }

    files
        .iter()
        .map(|path| {
            let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            Ok((path.display().to_string(), String::from_utf8_lossy(&bytes).into_owned()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    docsort::init_logger();
    let args = Args::parse();

    let mut config = ClassifierConfig::from_env();
    if let Some(max_length) = args.max_length {
        if max_length == 0 {
            warn!("Ignoring --max-length 0");
        } else {
            config.max_length = max_length;
        }
    }

    let start_time = Instant::now();
    let backend = build_backend(&args, config).await?;
    info!("Classifier ready in {:?}", start_time.elapsed());

    for (name, text) in read_inputs(&args.files)? {
        backend.report(&name, &text, args.explain);
    }

    Ok(())
}
