//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::Parser;

/// DWGファイルをAPS Design Automationで処理するCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "da-runner")]
#[command(about = "Run an AutoCAD script against a drawing with APS Design Automation", long_about = None)]
pub struct Args {
    /// Input drawing to upload
    pub input: String,

    /// Script file name inside the scripts directory
    #[arg(short, long, default_value = "modify_title.lsp")]
    pub script: String,

    /// Output file name
    #[arg(short, long, default_value = "result.pdf")]
    pub output: String,

    /// Activity to run
    #[arg(short, long, default_value = "AutoCAD.ModifyTitleBlock+prod")]
    pub activity: String,

    /// Maximum seconds to wait for the work item
    #[arg(short, long, default_value_t = 300)]
    pub timeout: u64,

    /// Download URL lifetime in seconds (60-3600)
    #[arg(short, long, default_value_t = 3600)]
    pub expires: u64,

    /// Config file path (environment variables take precedence)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding work_item.json, execute_script.scr and scripts
    #[arg(long, default_value = "scripts")]
    pub scripts_dir: String,
}
