use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use etner_core::config::LabelingConfig;
use etner_core::corpus::SampleSize;
use etner_core::normalizer::normalize;
use etner_core::pipeline::label_corpus;
use etner_core::NerPipeline;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rotula as mensagens de um CSV do coletor e grava o arquivo CoNLL
    Label(LabelArgs),
    /// Mostra o texto normalizado
    Normalize(TextArgs),
    /// Mostra tokens e tags de uma mensagem, no formato CoNLL
    Tag(TextArgs),
}

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Arquivo JSON de configuração; os demais argumentos sobrescrevem seus valores
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// CSV gerado pelo coletor
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Arquivo CoNLL de saída
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// JSON com gazetteers próprios
    #[arg(long)]
    pub gazetteers: Option<PathBuf>,

    /// Quantas mensagens rotular: "all" ou um número
    #[arg(long)]
    pub sample: Option<SampleSize>,

    /// Rotula em paralelo
    #[arg(long)]
    pub parallel: bool,

    /// Omite mensagens sem tokens
    #[arg(long)]
    pub skip_empty: bool,
}

impl LabelArgs {
    fn into_config(self) -> Result<LabelingConfig> {
        let mut config = match &self.config {
            Some(path) => LabelingConfig::from_json_file(path)
                .with_context(|| format!("falha ao ler a configuração {}", path.display()))?,
            None => LabelingConfig::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.gazetteers.is_some() {
            config.gazetteers = self.gazetteers;
        }
        if let Some(sample) = self.sample {
            config.sample = sample;
        }
        config.parallel |= self.parallel;
        config.skip_empty |= self.skip_empty;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct TextArgs {
    /// Mensagem a processar
    pub text: String,
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Label(args) => run_label(args),
            Commands::Normalize(args) => {
                println!("{}", normalize(&args.text));
                Ok(())
            }
            Commands::Tag(args) => {
                let message = NerPipeline::new().analyze(&args.text);
                print!("{}", message.to_conll_block());
                Ok(())
            }
        }
    }
}

fn run_label(args: LabelArgs) -> Result<()> {
    let config = args.into_config()?;
    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        sample = %config.sample,
        parallel = config.parallel,
        "iniciando rotulagem"
    );

    let summary = label_corpus(&config)
        .with_context(|| format!("falha ao rotular {}", config.input.display()))?;

    info!(
        messages = summary.messages,
        tokens = summary.tokens,
        entities = summary.entities,
        "rotulagem concluída"
    );
    Ok(())
}
