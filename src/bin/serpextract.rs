//! serpextract 命令行工具
//! 输出格式：每个URL一行 `"引擎名","关键词"`，非SERP输出 `"",""`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use serpextract::{ExtractOptions, ExtractResult, RuleConfig, SerpDetector};

#[derive(Parser, Debug)]
#[clap(
    name = "serpextract",
    version,
    about = "Classify referrer URLs as search engine result pages and extract the search keyword."
)]
struct Cli {
    /// 列出全部匹配键与对应规则
    #[clap(short, long)]
    list: bool,

    /// 使用本地 JSON 规则表替代内置规则
    #[clap(short, long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// 规则表未命中时启用朴素回退
    #[clap(long)]
    naive: bool,

    /// 保留原始关键词（不做小写与空白处理）
    #[clap(long)]
    raw: bool,

    /// 以 JSON Lines 输出结果
    #[clap(long)]
    json: bool,

    /// 待识别的URL
    urls: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if !cli.list && cli.urls.is_empty() {
        // 与 argparse 行为一致：缺少参数时打印用法并返回1
        let _ = Cli::command().write_usage(&mut std::io::stderr());
        eprintln!();
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("serpextract: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.rules {
        Some(path) => RuleConfig::local_file(path),
        None => RuleConfig::embedded(),
    };
    let detector = SerpDetector::new(config).context("failed to build detector")?;

    if cli.list {
        print_rules(&detector);
        return Ok(());
    }

    let options = if cli.raw {
        ExtractOptions::raw()
    } else {
        ExtractOptions::default()
    }
    .with_naive(cli.naive);

    for url in &cli.urls {
        let result = detector.extract_with(url, None, &options);
        if cli.json {
            println!("{}", json_line(url, result.as_ref())?);
        } else {
            println!("{}", csv_line(result.as_ref()));
        }
    }
    Ok(())
}

fn print_rules(detector: &SerpDetector) {
    let rules = detector.rules();
    println!("{:<30}{}", "Fuzzy Domain", "Parser");
    for (key, rule) in &rules {
        println!("{:<30}{}", key, rule);
    }
    println!("{} parsers.", rules.len());
}

fn csv_line(result: Option<&ExtractResult>) -> String {
    match result {
        Some(res) => format!("\"{}\",\"{}\"", quote(&res.engine_name), quote(&res.keyword)),
        None => "\"\",\"\"".to_string(),
    }
}

fn quote(field: &str) -> String {
    field.replace('"', "\\\"")
}

fn json_line(url: &str, result: Option<&ExtractResult>) -> Result<String> {
    let value = serde_json::json!({
        "url": url,
        "result": result,
    });
    serde_json::to_string(&value).context("failed to serialize result")
}
