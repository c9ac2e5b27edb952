// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. clap parses the
// subcommand; everything else is delegated to Layer 2. The
// subcommand enum is the explicit mode value — each arm builds
// a distinct, mode-specific pipeline.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvalArgs, PredictArgs, TrainArgs};

use crate::application::factory::{create_model, HarnessParams};

#[derive(Parser, Debug)]
#[command(
    name = "mnist-trainer",
    version = "0.1.0",
    about = "Train, evaluate and export a fully connected MNIST digit classifier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the mode-specific use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Eval(args) => run_eval(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainPaths, TrainUseCase};

    // Factory first: it consumes --learning_rate and injects the
    // harness defaults into the residual list.
    let (model_cfg, task_args) = create_model(&args.overrides)?;
    let harness = HarnessParams::from_args(&task_args)?;

    tracing::info!(
        "Starting training: data '{}', max_steps {}",
        args.data_dir,
        harness.max_steps,
    );

    let paths = TrainPaths {
        data_dir: args.data_dir,
        eval_data_dir: args.eval_data_dir,
        checkpoint_dir: args.checkpoint_dir,
    };
    TrainUseCase::new(paths, model_cfg, harness).execute()?;

    println!("Training complete. Checkpoint saved.");
    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    use crate::application::eval_use_case::EvalUseCase;

    // The eval pipeline ignores the learning rate but shares the
    // harness surface (batch_size, eval_set_size).
    let (_, task_args) = create_model(&args.overrides)?;
    let harness = HarnessParams::from_args(&task_args)?;

    EvalUseCase::new(args.data_dir, args.checkpoint_dir, harness).execute()
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    PredictUseCase::new(args.checkpoint_dir, args.export_dir, args.input).execute()
}
