// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands — train, eval, predict — one per pipeline
// mode. Path-like settings are ordinary clap flags; model and
// harness hyperparameters ride after a `--` separator and are
// merged by the model factory (Layer 2), so the non-destructive
// override policy applies to them.
//
// Examples:
//   mnist-trainer train --data-dir data/train --eval-data-dir data/eval
//   mnist-trainer train -- --learning_rate 0.05 --batch_size=50
//   mnist-trainer eval  --data-dir data/eval
//   mnist-trainer predict --input batch.jsonl --export-dir export

use clap::{Args, Subcommand};

/// The three top-level subcommands, one per pipeline mode.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the digit classifier on labelled records
    Train(TrainArgs),

    /// Evaluate a trained checkpoint on labelled records
    Eval(EvalArgs),

    /// Export the serving signature and run batch prediction
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing training record files (*.jsonl)
    #[arg(long, default_value = "data/train")]
    pub data_dir: String,

    /// Directory containing eval record files (*.jsonl)
    #[arg(long, default_value = "data/eval")]
    pub eval_data_dir: String,

    /// Directory for checkpoints, model config and metrics CSV
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Hyperparameter overrides after `--`, e.g.
    /// `-- --learning_rate 0.05 --max_steps 1000`
    #[arg(last = true)]
    pub overrides: Vec<String>,
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Directory containing eval record files (*.jsonl)
    #[arg(long, default_value = "data/eval")]
    pub data_dir: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Hyperparameter overrides after `--`
    #[arg(last = true)]
    pub overrides: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Directory for signature.json and predictions.csv
    #[arg(long, default_value = "export")]
    pub export_dir: String,

    /// JSONL file of prediction records; omit to export the
    /// signature without running a prediction batch
    #[arg(long)]
    pub input: Option<String>,
}
